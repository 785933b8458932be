//! The `passpilot health` command.

use anyhow::Result;

use super::{build_analyzer, GlobalArgs};

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let health = analyzer.health();

    global.emit("health", &config, &health, |h| {
        println!("Data directory: {}", config.data_dir.display());
        if h.ready {
            println!("Exam analyzer: ready");
        } else {
            println!(
                "Exam analyzer: NOT READY ({})",
                h.reason.as_deref().unwrap_or("unknown")
            );
        }
        println!(
            "Questions: {} loaded, {} rejected, {} indexed",
            h.questions, h.rejected_records, h.indexed_questions
        );
        if h.embedding_warnings > 0 {
            println!("{} question(s) excluded from the index", h.embedding_warnings);
        }
    })
}
