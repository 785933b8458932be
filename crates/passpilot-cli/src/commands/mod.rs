pub mod health;
pub mod init;
pub mod query;
pub mod simulate;
pub mod stats;
pub mod strategy;
pub mod topics;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use passpilot_core::analyzer::ExamAnalyzer;
use passpilot_core::config::{load_config_from, PassPilotConfig};
use passpilot_core::report::AnalysisReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Options shared by every subcommand.
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub format: Format,
    pub save: Option<PathBuf>,
}

impl GlobalArgs {
    /// Load config and apply the `--data-dir` override.
    pub fn load_config(&self) -> Result<PassPilotConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        tracing::debug!("using data directory {}", config.data_dir.display());
        Ok(config)
    }

    /// Print `payload` as JSON or via `print_text`, and save it if `--save` was given.
    pub fn emit<T: Serialize>(
        &self,
        command: &str,
        config: &PassPilotConfig,
        payload: &T,
        print_text: impl FnOnce(&T),
    ) -> Result<()> {
        match self.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(payload)?),
            Format::Text => print_text(payload),
        }

        if let Some(path) = &self.save {
            AnalysisReport::new(command, payload)?
                .with_data_dir(&config.data_dir)
                .save_json(path)?;
            eprintln!("Report saved to: {}", path.display());
        }
        Ok(())
    }
}

/// Load config and build the analyzer.
pub fn build_analyzer(global: &GlobalArgs) -> Result<(PassPilotConfig, ExamAnalyzer)> {
    let config = global.load_config()?;
    let analyzer = ExamAnalyzer::initialize(&config);
    Ok((config, analyzer))
}
