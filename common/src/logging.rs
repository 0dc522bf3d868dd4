use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Json,
    Pretty,
    Compact,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("invalid logging mode: {s}")),
        }
    }
}

/// Initializes the global tracing subscriber. The level is a tracing env
/// filter. Must only be called once per process.
pub fn init(level: &str, mode: Mode) -> Result<()> {
    let env_filter = EnvFilter::from_str(level)?;

    let filter = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_env_filter(env_filter);

    match mode {
        Mode::Default => filter.finish().try_init(),
        Mode::Json => filter.json().finish().try_init(),
        Mode::Pretty => filter.pretty().finish().try_init(),
        Mode::Compact => filter.compact().finish().try_init(),
    }
    .map_err(|err| anyhow::anyhow!("failed to init logging: {err}"))
}
