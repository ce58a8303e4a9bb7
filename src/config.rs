//! Runtime settings, read from the environment and then the command line.
use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const USAGE: &str = "\
Usage: merge-2048 [-s <seed>]

Arrow keys move the tiles, q quits.

Options:
  -s, --seed <seed>  Seed the tile spawner
  -h, --help         Show this help message

Environment:
  MERGE_2048_SEED       Spawner seed, overridden by --seed
  MERGE_2048_SLIDE_MS   Slide animation length in milliseconds (default 100)
  MERGE_2048_APPEAR_MS  Appear animation length in milliseconds (default 150)
  MERGE_2048_LOG        Write logs to this file instead of stderr
  RUST_LOG              Log filter (default warn)
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Spawner seed; drawn from entropy when unset.
    pub seed: Option<u64>,
    pub slide: Duration,
    pub appear: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            slide: Duration::from_millis(100),
            appear: Duration::from_millis(150),
            log_file: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Play(Config),
    Help,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("Invalid seed {0}")]
    InvalidSeed(String),

    #[error("Invalid arguments: {0}")]
    Unknown(String),
}

impl Config {
    /// Reads `MERGE_2048_*` variables. Unparsable values keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = parse(&lookup, "MERGE_2048_SEED") {
            config.seed = Some(seed);
        }

        if let Some(millis) = parse(&lookup, "MERGE_2048_SLIDE_MS") {
            config.slide = Duration::from_millis(millis);
        }

        if let Some(millis) = parse(&lookup, "MERGE_2048_APPEAR_MS") {
            config.appear = Duration::from_millis(millis);
        }

        config.log_file = lookup("MERGE_2048_LOG")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        config
    }

    /// Applies command line arguments (program name excluded).
    pub fn with_args(mut self, args: &[String]) -> Result<Command, ArgsError> {
        match args {
            [] => {}
            [flag] if flag == "-h" || flag == "--help" => return Ok(Command::Help),
            [flag, seed] if flag == "-s" || flag == "--seed" => {
                let Ok(seed) = seed.parse() else {
                    return Err(ArgsError::InvalidSeed(seed.clone()));
                };

                self.seed = Some(seed);
            }
            _ => return Err(ArgsError::Unknown(args.join(" "))),
        }

        Ok(Command::Play(self))
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.trim().parse().ok()
}
