//! The `passpilot stats` command.

use std::fmt::Display;

use anyhow::Result;
use comfy_table::{Cell, Table};

use passpilot_core::statistics::Distribution;

use super::{build_analyzer, GlobalArgs};

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let stats = analyzer.stats()?;

    global.emit("stats", &config, &stats, |s| {
        println!(
            "Questions: {} ({} rejected, {} indexed)",
            s.total_questions, s.rejected_records, s.indexed_questions
        );
        println!(
            "Topics: {} ({} untagged question(s))",
            s.total_topics, s.untagged_questions
        );
        print_distribution("Module", &s.modules);
        print_distribution("Marks", &s.marks);
        print_distribution("Year", &s.years);
    })
}

fn print_distribution<K: Ord + Display>(label: &str, dist: &Distribution<K>) {
    let mut table = Table::new();
    table.set_header(vec![label, "Questions"]);
    for (key, count) in &dist.buckets {
        table.add_row(vec![Cell::new(key), Cell::new(count)]);
    }
    if dist.unknown > 0 {
        table.add_row(vec![Cell::new("(unknown)"), Cell::new(dist.unknown)]);
    }
    println!("{table}");
}
