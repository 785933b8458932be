//! The `passpilot topics` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use passpilot_core::model::TopicRecord;

use super::{build_analyzer, GlobalArgs};

#[derive(Serialize)]
struct TopicsOutput {
    total_topics: usize,
    min_frequency: usize,
    topics: Vec<TopicRecord>,
}

pub fn execute(global: &GlobalArgs, min_frequency: Option<usize>) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let min_frequency = min_frequency.unwrap_or(config.topics.min_frequency);

    let topics = analyzer.topic_analysis(min_frequency)?;
    let output = TopicsOutput {
        total_topics: topics.len(),
        min_frequency,
        topics,
    };

    global.emit("topics", &config, &output, |o| {
        if o.topics.is_empty() {
            println!("No topics appear at least {} time(s).", o.min_frequency);
            return;
        }
        let mut table = Table::new();
        table.set_header(vec!["Topic", "Frequency", "Avg Marks", "Total Marks", "Modules"]);
        for t in &o.topics {
            let modules: Vec<&str> = t.modules.iter().map(String::as_str).collect();
            table.add_row(vec![
                Cell::new(&t.topic),
                Cell::new(t.frequency),
                Cell::new(format!("{:.1}", t.average_marks)),
                Cell::new(t.total_marks),
                Cell::new(modules.join(", ")),
            ]);
        }
        println!("{table}");
        println!("{} topic(s) with frequency >= {}", o.total_topics, o.min_frequency);
    })
}
