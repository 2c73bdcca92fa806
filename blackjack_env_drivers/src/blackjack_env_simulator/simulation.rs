use std::fmt;

use self::private::Statistics;
use blackjack_env::simulation::{hand::Hand, EpisodeEventHandler};
use blackjack_env::strategy::{RandomStrategy, Strategy, StrategyKind, ThresholdStrategy};
use blackjack_env::{Action, BlackjackEnv, EnvError, Observation, Rule};
use blackjack_env_drivers::{Config, ConfigError};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
}

mod private {
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Statistics {
        episodes: u64,
        total_reward: f64,
        wins: u64,
        losses: u64,
        pushes: u64,

        last_total_reward: f64,
        last_episodes: u64,

        min_total_reward: f64,
    }

    impl Statistics {
        pub fn record(&mut self, reward: f64) {
            self.episodes += 1;
            self.total_reward += reward;
            if reward > 0.0 {
                self.wins += 1;
            } else if reward < 0.0 {
                self.losses += 1;
            } else {
                self.pushes += 1;
            }
            if self.min_total_reward > self.total_reward {
                self.min_total_reward = self.total_reward;
            }
        }

        pub fn get_episodes(&self) -> u64 {
            self.episodes
        }

        pub fn get_total_reward(&self) -> f64 {
            self.total_reward
        }

        pub fn get_outcomes(&self) -> (u64, u64, u64) {
            (self.wins, self.losses, self.pushes)
        }

        pub fn get_mean_reward(&self) -> f64 {
            if self.episodes == 0 {
                0.0
            } else {
                self.total_reward / self.episodes as f64
            }
        }

        /// Mean reward of the episodes since the last call.
        pub fn get_delta_mean_reward(&mut self) -> f64 {
            let episodes = self.episodes - self.last_episodes;
            let reward = self.total_reward - self.last_total_reward;
            self.last_episodes = self.episodes;
            self.last_total_reward = self.total_reward;
            if episodes == 0 {
                0.0
            } else {
                reward / episodes as f64
            }
        }

        pub fn get_min_total_reward(&self) -> f64 {
            self.min_total_reward
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Handler {
    episode_id: u64,
    decisions: Vec<Action>,
    doubles: u64,
    busts: u64,
    stat: Statistics,
}

impl EpisodeEventHandler for Handler {
    fn on_reset(&mut self, _: &Observation) {
        self.episode_id += 1;
        self.decisions.clear();
    }

    fn on_decision(&mut self, _: &Observation, action: Action) {
        self.decisions.push(action);
        if action == Action::Double {
            self.doubles += 1;
        }
    }

    fn on_player_bust(&mut self, _: &Hand) {
        self.busts += 1;
    }

    fn on_episode_end(&mut self, player_hand: &Hand, dealer_hand: &Hand, reward: f64) {
        debug!(
            "Episode #{}: decisions {:?}, player {:?}, dealer {:?}, reward {}",
            self.episode_id,
            self.decisions,
            player_hand.get_cards(),
            dealer_hand.get_cards(),
            reward
        );
        self.stat.record(reward);
    }
}

/// Final report of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub episodes: u64,
    pub total_reward: f64,
    pub mean_reward: f64,
    pub min_total_reward: f64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    pub doubles: u64,
    pub busts: u64,
    pub reshuffles: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episodes: {}. Total reward: {}. Mean reward: {:.4}. Min total reward: {}. \
             Win/Loss/Push: {}/{}/{}. Doubles: {}. Busts: {}. Reshuffles: {}.",
            self.episodes,
            self.total_reward,
            self.mean_reward,
            self.min_total_reward,
            self.wins,
            self.losses,
            self.pushes,
            self.doubles,
            self.busts,
            self.reshuffles
        )
    }
}

fn build_strategy(config: &Config, seed: u64) -> Result<Box<dyn Strategy>, ConfigError> {
    let simulator = &config.simulator;
    let strategy: Box<dyn Strategy> = match simulator.strategy_kind()? {
        StrategyKind::Threshold => Box::new(ThresholdStrategy::new(
            simulator.stick_on,
            simulator.double_on_hard.clone(),
            simulator.double_min_count,
        )),
        StrategyKind::Random => Box::new(RandomStrategy::new(ChaCha8Rng::seed_from_u64(
            seed.wrapping_add(1),
        ))),
    };
    Ok(strategy)
}

/// Plays the configured number of episodes and returns the statistics.
pub fn simulate_episodes(config: Config) -> Result<Summary, SimulationError> {
    let rule: Rule = config.rule.clone().try_into()?;
    let seed = config.simulator.seed.unwrap_or_else(rand::random);
    let mut strategy = build_strategy(&config, seed)?;
    let mut env = BlackjackEnv::seeded(&rule, seed)?;
    let mut handler: Handler = Default::default();
    info!(
        "Simulating {} episodes with seed {}",
        config.simulator.episodes, seed
    );

    for _ in 0..config.simulator.episodes {
        env.play_episode(strategy.as_mut(), &mut handler)?;

        let episodes = handler.stat.get_episodes();
        if config.simulator.report_every > 0 && episodes % config.simulator.report_every == 0 {
            info!(
                "{} episodes. Mean reward: {:.4} (last period {:.4}). Running count: {}.",
                episodes,
                handler.stat.get_mean_reward(),
                handler.stat.get_delta_mean_reward(),
                env.running_count()
            );
        }
    }

    let (wins, losses, pushes) = handler.stat.get_outcomes();
    Ok(Summary {
        episodes: handler.stat.get_episodes(),
        total_reward: handler.stat.get_total_reward(),
        mean_reward: handler.stat.get_mean_reward(),
        min_total_reward: handler.stat.get_min_total_reward(),
        wins,
        losses,
        pushes,
        doubles: handler.doubles,
        busts: handler.busts,
        reshuffles: env.shoe().get_number_of_reshuffles(),
    })
}
