//! The `passpilot validate` command.

use anyhow::Result;
use serde::Serialize;

use passpilot_core::loader::load_corpus;
use passpilot_core::model::LoadWarning;

use super::GlobalArgs;

#[derive(Serialize)]
struct ValidationOutput {
    data_dir: String,
    accepted: usize,
    rejected: usize,
    warnings: Vec<LoadWarning>,
}

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    if !config.data_dir.is_dir() {
        anyhow::bail!("data directory {} not found", config.data_dir.display());
    }

    let corpus = load_corpus(&config.data_dir);
    let output = ValidationOutput {
        data_dir: config.data_dir.display().to_string(),
        accepted: corpus.len(),
        rejected: corpus.rejected(),
        warnings: corpus.warnings().to_vec(),
    };

    global.emit("validate", &config, &output, |o| {
        println!("Data directory: {}", o.data_dir);
        println!("{} question(s) accepted, {} rejected", o.accepted, o.rejected);
        for w in &o.warnings {
            let prefix = match w.record {
                Some(i) => format!("  [{}#{i}]", w.path.display()),
                None => format!("  [{}]", w.path.display()),
            };
            println!("{prefix} WARNING: {}", w.message);
        }
        if o.warnings.is_empty() {
            println!("All question files valid.");
        } else {
            println!("\n{} warning(s) found.", o.warnings.len());
        }
    })
}
