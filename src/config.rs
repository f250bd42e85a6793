use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Parser)]
#[command(name = "noteboard", version, about = "Terminal client for a notes HTTP API")]
pub struct Cli {
    /// Server hosting the /api/notes resource
    #[arg(long, env = "NOTEBOARD_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, env = "NOTEBOARD_LOG")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log_file: PathBuf,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            base_url: cli.base_url,
            log_file: cli.log_file.unwrap_or_else(default_log_file),
        }
    }
}

/// `<cache dir>/noteboard/noteboard.log`, or the temp dir if there is no cache dir
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("noteboard")
        .join("noteboard.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win() {
        let cli = Cli::try_parse_from([
            "noteboard",
            "--base-url",
            "http://notes.internal:8080",
            "--log-file",
            "/tmp/nb.log",
        ])
        .unwrap();
        let config = Config::from(cli);
        assert_eq!(config.base_url, "http://notes.internal:8080");
        assert_eq!(config.log_file, PathBuf::from("/tmp/nb.log"));
    }

    #[test]
    fn log_file_defaults_under_noteboard_dir() {
        let config = Config::from(Cli {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_file: None,
        });
        assert_eq!(config.log_file, default_log_file());
        assert!(config.log_file.ends_with("noteboard/noteboard.log"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["noteboard", "--timeout", "5"]).is_err());
    }
}
