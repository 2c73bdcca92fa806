mod simulation;

use std::process::ExitCode;

use blackjack_env_drivers::parse_config_from_file;
use clap::Parser;
use log::{error, info};

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_env.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Overrides the number of episodes in the config file
    #[arg(short, long)]
    episodes: Option<u64>,
}

fn resolve_config_path(config: &str) -> Result<String, String> {
    if config != DEFAULT_CONFIG_PATH {
        return Ok(config.to_string());
    }
    let home_dir = home::home_dir().ok_or("Cannot find home directory")?;
    let config_file_path = home_dir.join(".blackjack_env.yml");
    if !config_file_path.exists() {
        return Err(format!("Config file {} not exists", config_file_path.display()));
    }
    if config_file_path.is_dir() {
        return Err(String::from("This should be a path rather than a directory"));
    }
    Ok(config_file_path.to_string_lossy().into_owned())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandLineArgs::parse();

    let config_path = match resolve_config_path(&args.config) {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut config = match parse_config_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(episodes) = args.episodes {
        config.simulator.episodes = episodes;
    }
    info!("Using config {}: {:?}", config_path, config);

    match simulation::simulate_episodes(config) {
        Ok(summary) => {
            info!("{}", summary);
            match serde_yaml::to_string(&summary) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => error!("Cannot serialize summary: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
