pub mod card_count;
pub mod count;
mod error;
pub mod simulation;
pub mod spaces;
pub mod strategy;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

pub use card_count::CardCount;
pub use count::{plus_minus_weight, CountTracker};
pub use error::EnvError;
pub use simulation::{BlackjackEnv, Phase};

/// Number of cards in one deck.
pub const CARDS_PER_DECK: u16 = 52;

/// Construction-time rules of an environment. Immutable for the lifetime of
/// the environment that was built from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// Pays 1.5 on a winning natural, like casino rules.
    pub natural: bool,
    /// Strict Sutton & Barto semantics: a natural wins outright unless the
    /// dealer also has one. Takes precedence over `natural`.
    pub sab: bool,
    pub number_of_decks: u8,
    /// The shoe is rebuilt before a draw once fewer cards than this remain.
    pub reshuffle_threshold: u16,
}

impl Rule {
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.number_of_decks == 0 {
            return Err(EnvError::InvalidRule(String::from(
                "number_of_decks must be at least 1",
            )));
        }
        let full_shoe = self.number_of_decks as u16 * CARDS_PER_DECK;
        if self.reshuffle_threshold == 0 || self.reshuffle_threshold > full_shoe {
            return Err(EnvError::InvalidRule(format!(
                "reshuffle_threshold must be in [1, {}]",
                full_shoe
            )));
        }
        Ok(())
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            natural: false,
            sab: false,
            number_of_decks: 1,
            reshuffle_threshold: 15,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Action {
    Stick,
    Hit,
    Double,
}

impl Action {
    /// The integer encoding used by the action space.
    pub fn index(&self) -> u8 {
        match self {
            Action::Stick => 0,
            Action::Hit => 1,
            Action::Double => 2,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = EnvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Stick),
            1 => Ok(Action::Hit),
            2 => Ok(Action::Double),
            _ => Err(EnvError::InvalidAction(value)),
        }
    }
}

/// What the agent sees after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub player_total: u8,
    /// The dealer's first card, the one dealt face up.
    pub dealer_up_card: u8,
    pub usable_ace: bool,
    pub running_count: i32,
}

impl Observation {
    pub fn as_tuple(&self) -> (u8, u8, u8, i32) {
        (
            self.player_total,
            self.dealer_up_card,
            self.usable_ace as u8,
            self.running_count,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    /// Always empty.
    pub info: HashMap<String, String>,
}
