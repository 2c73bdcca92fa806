use std::ops::Index;

/// Copies of each card rank (1 to 10 inclusive) in a single deck. Rank 10
/// stands for 10, J, Q and K.
const RANKS_IN_ONE_DECK: [u16; 10] = [4, 4, 4, 4, 4, 4, 4, 4, 4, 16];

/// This provides a container to store the numbers of each card rank (from
/// 1 to 10 inclusive). The shoe uses it for the cards still in play, a hand
/// for the cards it holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardCount {
    counts: [u16; 10],
    sum: u16,
    total: u16,
}

impl CardCount {
    pub fn new(counts: &[u16; 10]) -> CardCount {
        let mut card_count = CardCount {
            counts: *counts,
            sum: 0,
            total: 0,
        };

        card_count.propagate_counts();

        card_count
    }

    pub fn with_number_of_decks(number_of_decks: u8) -> CardCount {
        let mut counts = RANKS_IN_ONE_DECK;
        for count in counts.iter_mut() {
            *count *= number_of_decks as u16;
        }
        Self::new(&counts)
    }

    /// Add a card of given rank.
    ///
    /// Note that this method won't check if the rank is valid.
    pub fn add_card(&mut self, rank: u8) {
        self.counts[(rank - 1) as usize] += 1;
        self.sum += rank as u16;
        self.total += 1;
    }

    /// Remove a card of given rank.
    ///
    /// Note that this method won't check if the rank is valid. It also
    /// won't check if the number of the given rank is already 0.
    pub fn remove_card(&mut self, rank: u8) {
        self.counts[(rank - 1) as usize] -= 1;
        self.sum -= rank as u16;
        self.total -= 1;
    }

    /// Note that this method treats Ace as 1.
    pub fn get_sum(&self) -> u16 {
        self.sum
    }

    pub fn get_total(&self) -> u16 {
        self.total
    }

    pub fn has_ace(&self) -> bool {
        self.counts[0] > 0
    }

    /// An Ace can count as 11 without busting.
    pub fn has_usable_ace(&self) -> bool {
        self.has_ace() && self.sum + 10 <= 21
    }

    pub fn get_actual_sum(&self) -> u16 {
        if self.has_usable_ace() {
            self.sum + 10
        } else {
            self.sum
        }
    }

    pub fn bust(&self) -> bool {
        self.get_actual_sum() > 21
    }

    pub fn is_natural(&self) -> bool {
        self.total == 2 && self.counts[0] == 1 && self.counts[9] == 1
    }

    /// Returns the rank of the `k`-th card when the cards are lined up by
    /// rank, or None if `k` is out of range. Drawing `k` uniformly from
    /// `0..get_total()` draws a card weighted by the copies left of each rank.
    pub fn nth_card(&self, k: u16) -> Option<u8> {
        let mut remaining = k;
        for (i, &count) in self.counts.iter().enumerate() {
            if remaining < count {
                return Some((i + 1) as u8);
            }
            remaining -= count;
        }
        None
    }

    /// Checks whether every card in `other` is also present here.
    pub fn contains(&self, other: &CardCount) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(mine, theirs)| mine >= theirs)
    }

    fn propagate_counts(&mut self) {
        self.sum = 0;
        self.total = 0;
        for i in 0..self.counts.len() {
            self.sum += ((i + 1) as u16) * self.counts[i];
            self.total += self.counts[i];
        }
    }
}

impl Index<u8> for CardCount {
    type Output = u16;
    fn index(&self, index: u8) -> &Self::Output {
        &self.counts[(index - 1) as usize]
    }
}
