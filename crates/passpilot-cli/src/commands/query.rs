//! The `passpilot query` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use passpilot_core::analyzer::QueryResponse;

use super::{build_analyzer, GlobalArgs};

pub fn execute(
    global: &GlobalArgs,
    query: String,
    threshold: Option<f32>,
    top_k: Option<i64>,
) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let threshold = threshold.unwrap_or(config.search.similarity_threshold);
    let top_k = top_k.unwrap_or(config.search.top_k);

    let response = analyzer.query(&query, threshold, top_k)?;
    global.emit("query", &config, &response, print_response)
}

fn print_response(response: &QueryResponse<'_>) {
    println!("Query: {}", response.query);
    println!("{} match(es)", response.total_matches);
    if response.results.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Score", "Module", "Topic", "Marks", "Year", "Question"]);
    for hit in &response.results {
        let q = hit.question;
        table.add_row(vec![
            Cell::new(format!("{:.3}", hit.similarity)),
            Cell::new(&q.module),
            Cell::new(q.topic.as_deref().unwrap_or("-")),
            Cell::new(q.marks),
            Cell::new(q.year.as_deref().unwrap_or("-")),
            Cell::new(&q.text),
        ]);
    }
    println!("{table}");

    let modules: Vec<String> = response
        .module_distribution
        .buckets
        .iter()
        .map(|(m, n)| format!("{m}: {n}"))
        .collect();
    println!("By module: {}", modules.join(", "));

    let marks: Vec<String> = response
        .marks_distribution
        .buckets
        .iter()
        .map(|(m, n)| format!("{m} marks: {n}"))
        .collect();
    println!("By marks: {}", marks.join(", "));
}
