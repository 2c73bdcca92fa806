use rand::seq::IteratorRandom;
use rand::Rng;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;

use crate::{Action, Observation};

pub trait Strategy {
    /// Called before the first decision of every episode.
    fn new_episode(&mut self) {}
    fn decide(&mut self, observation: &Observation) -> Action;
}

/// Names of the strategies a driver can pick from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum StrategyKind {
    Threshold,
    Random,
}

/// Sticks at `stick_on` or more and hits below it. On the first decision of
/// an episode it doubles a hard total listed in `double_on_hard`, as long as
/// the running count is at least `double_min_count`.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    pub stick_on: u8,
    pub double_on_hard: Vec<u8>,
    pub double_min_count: i32,
    first_decision: bool,
}

impl ThresholdStrategy {
    pub fn new(stick_on: u8, double_on_hard: Vec<u8>, double_min_count: i32) -> Self {
        Self {
            stick_on,
            double_on_hard,
            double_min_count,
            first_decision: true,
        }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(17, vec![10, 11], 0)
    }
}

impl Strategy for ThresholdStrategy {
    fn new_episode(&mut self) {
        self.first_decision = true;
    }

    fn decide(&mut self, observation: &Observation) -> Action {
        let first_decision = std::mem::replace(&mut self.first_decision, false);
        if first_decision
            && !observation.usable_ace
            && observation.running_count >= self.double_min_count
            && self.double_on_hard.contains(&observation.player_total)
        {
            Action::Double
        } else if observation.player_total >= self.stick_on {
            Action::Stick
        } else {
            Action::Hit
        }
    }
}

/// Picks every action with equal probability.
#[derive(Debug, Clone)]
pub struct RandomStrategy<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomStrategy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn decide(&mut self, _: &Observation) -> Action {
        Action::iter()
            .choose(&mut self.rng)
            .unwrap_or(Action::Stick)
    }
}
