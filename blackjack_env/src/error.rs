use thiserror::Error;

use crate::simulation::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Invalid action {0}! It must be 0 (stick), 1 (hit) or 2 (double)")]
    InvalidAction(u8),
    #[error("{operation} is only allowed in {expected} phase, but the phase is {actual}")]
    WrongPhase {
        operation: &'static str,
        expected: Phase,
        actual: Phase,
    },
    #[error("The given first cards {0:?} cannot be drawn from the shoe")]
    InvalidFirsts(Vec<u8>),
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}
