/// Hi-Lo ("plus/minus") weight of each rank, indexed by rank - 1.
static PLUS_MINUS_WEIGHTS: [i32; 10] = [-1, 1, 1, 1, 1, 1, 0, 0, 0, -1];

/// Returns the count weight of a rank: +1 for 2 to 6, 0 for 7 to 9, -1 for
/// Ace and ten-valued cards.
///
/// Panics if the rank is not in [1, 10].
pub fn plus_minus_weight(rank: u8) -> i32 {
    PLUS_MINUS_WEIGHTS[(rank - 1) as usize]
}

/// Running count of every card dealt since the last reshuffle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountTracker {
    value: i32,
    applied: u32,
}

impl CountTracker {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn apply(&mut self, rank: u8) {
        self.value += plus_minus_weight(rank);
        self.applied += 1;
    }

    /// Called when the shoe is rebuilt.
    pub fn reset(&mut self) {
        self.value = 0;
        self.applied = 0;
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Number of cards applied since the last reset.
    pub fn applied(&self) -> u32 {
        self.applied
    }
}
