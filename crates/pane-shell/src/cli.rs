// ABOUTME: Command-line arguments for pane-shell.
// ABOUTME: Config path, log level override, config bootstrap and the script to replay.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "pane-shell",
    version,
    about = "Replay a pane layout script against a headless host"
)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overriding the config file.
    #[arg(long = "log", value_enum)]
    pub log: Option<LogLevelArg>,

    /// Write the effective config to the default location and exit.
    #[arg(long = "write-config")]
    pub write_config: bool,

    /// Script to replay; standard input when omitted.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for Level {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_script() {
        let cli = Cli::try_parse_from(["pane-shell", "--log", "debug", "--config", "c.toml", "demo.pane"])
            .unwrap();
        assert_eq!(cli.log, Some(LogLevelArg::Debug));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert_eq!(cli.script, Some(PathBuf::from("demo.pane")));
        assert!(!cli.write_config);
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["pane-shell", "--log", "loud"]).is_err());
    }

    #[test]
    fn definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
