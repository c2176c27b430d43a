use crate::config::toml_config::TomlConfig;
use crate::core::cascade::RegionChangePolicy;
use crate::domain::model::Language;
use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "quake-explorer")]
#[command(about = "Explore recent earthquakes and the school seismometers that recorded them")]
pub struct CliConfig {
    /// TOML configuration file; built-in defaults apply without one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub language: Option<Language>,

    /// Directory for rendered artifacts.
    #[arg(long, global = true)]
    pub output: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub region_change: Option<RegionChangePolicy>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the earthquakes matching a year, region and minimum magnitude.
    Events {
        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, help = "Print the list as JSON")]
        json: bool,
    },
    /// List the school seismometers.
    Stations,
    /// Map of the selected earthquake and the station network.
    Map {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Arrival report for the selected school station and its reference station.
    Seismograms {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Record section of all school stations that recorded the earthquake.
    Section {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Predicted ray paths to the selected school station.
    Rays {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Selector values shared by the subcommands that need an earthquake.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Region label in either language, e.g. "Switzerland" or "Europa".
    #[arg(long)]
    pub region: Option<String>,

    /// One of the region's minimum magnitude choices.
    #[arg(long)]
    pub magnitude: Option<String>,

    /// Station code or display label.
    #[arg(long)]
    pub station: Option<String>,

    /// Position in the earthquake list.
    #[arg(long, default_value = "0")]
    pub event: usize,
}

impl CliConfig {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) if !path.exists() => {
                return Err(ExplorerError::MissingConfigError {
                    field: format!("config file {}", path.display()),
                });
            }
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(language) = self.language {
            config.session.language = language;
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(policy) = self.region_change {
            config.session.region_change = policy;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_overrides_apply_on_defaults() {
        let cli = CliConfig::parse_from([
            "quake-explorer",
            "--language",
            "de",
            "--output",
            "/tmp/quake",
            "map",
            "--region",
            "Europa",
            "--magnitude",
            "5.0",
        ]);

        let config = cli.load().unwrap();
        assert_eq!(config.language(), Language::De);
        assert_eq!(config.output_path(), "/tmp/quake");

        match cli.command {
            Command::Map { selection } => {
                assert_eq!(selection.region.as_deref(), Some("Europa"));
                assert_eq!(selection.event, 0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from(["quake-explorer", "stations", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Stations));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliConfig::parse_from([
            "quake-explorer",
            "--config",
            "/nonexistent/quake-explorer.toml",
            "stations",
        ]);
        assert!(matches!(cli.load(), Err(ExplorerError::MissingConfigError { .. })));
    }

    #[test]
    fn test_region_change_flag() {
        let cli = CliConfig::parse_from([
            "quake-explorer",
            "--region-change",
            "reset-only",
            "events",
        ]);
        assert_eq!(cli.load().unwrap().region_change_policy(), RegionChangePolicy::ResetOnly);
    }
}
