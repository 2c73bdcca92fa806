use blackjack_env::{self, strategy::StrategyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid rule in config file: {0}")]
    Rule(#[from] blackjack_env::EnvError),
    #[error("Invalid strategy in config file: {0}")]
    Strategy(#[from] serde::de::value::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub simulator: ConfigSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    #[serde(default)]
    pub natural: bool,
    #[serde(default)]
    pub sab: bool,
    #[serde(default = "default_number_of_decks")]
    pub number_of_decks: u8,
    #[serde(default = "default_reshuffle_threshold")]
    pub reshuffle_threshold: u16,
}

fn default_number_of_decks() -> u8 {
    blackjack_env::Rule::default().number_of_decks
}

fn default_reshuffle_threshold() -> u16 {
    blackjack_env::Rule::default().reshuffle_threshold
}

impl TryInto<blackjack_env::Rule> for ConfigRule {
    type Error = ConfigError;

    fn try_into(self) -> Result<blackjack_env::Rule, Self::Error> {
        let rule = blackjack_env::Rule {
            natural: self.natural,
            sab: self.sab,
            number_of_decks: self.number_of_decks,
            reshuffle_threshold: self.reshuffle_threshold,
        };
        rule.validate()?;

        Ok(rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSimulator {
    pub episodes: u64,
    pub seed: Option<u64>,
    pub report_every: u64,
    pub strategy: String,
    pub stick_on: u8,
    #[serde(default)]
    pub double_on_hard: Vec<u8>,
    #[serde(default)]
    pub double_min_count: i32,
}

impl ConfigSimulator {
    pub fn strategy_kind(&self) -> Result<StrategyKind, ConfigError> {
        Ok(self.strategy.parse()?)
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename)?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}
