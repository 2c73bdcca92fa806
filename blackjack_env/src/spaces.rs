//! Declared action and observation spaces.

use crate::{Action, Observation};

/// The integers `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    pub n: u32,
}

impl Discrete {
    pub const fn new(n: u32) -> Self {
        Self { n }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= 0 && value < self.n as i64
    }
}

/// Stick, hit, double.
pub const ACTION_SPACE: Discrete = Discrete::new(3);

/// Player total, dealer up card, usable ace, running count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationSpace {
    pub player_total: Discrete,
    pub dealer_up_card: Discrete,
    pub usable_ace: Discrete,
    pub running_count: Discrete,
}

pub const OBSERVATION_SPACE: ObservationSpace = ObservationSpace {
    player_total: Discrete::new(32),
    dealer_up_card: Discrete::new(11),
    usable_ace: Discrete::new(2),
    running_count: Discrete::new(41),
};

impl ObservationSpace {
    /// Checks every component against its declared range. The running count
    /// can be negative, so this is a declaration only and the environment
    /// never enforces it.
    pub fn contains(&self, observation: &Observation) -> bool {
        let (player_total, dealer_up_card, usable_ace, running_count) = observation.as_tuple();
        self.player_total.contains(player_total as i64)
            && self.dealer_up_card.contains(dealer_up_card as i64)
            && self.usable_ace.contains(usable_ace as i64)
            && self.running_count.contains(running_count as i64)
    }
}

pub fn action_space_contains(action: Action) -> bool {
    ACTION_SPACE.contains(action.index() as i64)
}
