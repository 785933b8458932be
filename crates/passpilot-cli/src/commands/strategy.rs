//! The `passpilot strategy` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use passpilot_core::planner::StrategyResult;

use super::{build_analyzer, GlobalArgs};
use crate::inputs::{PassArgs, PassInputs};

#[derive(Serialize)]
struct StrategyOutput {
    #[serde(flatten)]
    strategy: StrategyResult,
    inputs: PassInputs,
}

pub fn execute(global: &GlobalArgs, args: PassArgs) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let inputs = PassInputs::from_args(&args, &config.pass_rules)?;

    let strategy = analyzer.pass_strategy(&inputs.studied_topics, inputs.calculated_target_marks)?;
    let output = StrategyOutput { strategy, inputs };
    global.emit("strategy", &config, &output, print_strategy)
}

fn print_strategy(output: &StrategyOutput) {
    let s = &output.strategy;
    println!(
        "Target external marks: {:.1} (internal marks {:.1})",
        s.target_marks, output.inputs.internal_marks
    );

    if s.recommended_topics.is_empty() {
        println!("No additional topics needed.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["#", "Topic", "Frequency", "Avg Marks", "Cumulative"]);
        for (i, t) in s.recommended_topics.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&t.topic),
                Cell::new(t.frequency),
                Cell::new(format!("{:.1}", t.average_marks)),
                Cell::new(format!("{:.1}", t.cumulative_marks)),
            ]);
        }
        println!("{table}");
    }

    println!("Projected marks: {:.1}", s.projected_marks);
    if s.feasible {
        println!("Feasible: yes (margin {:+.1})", s.margin);
    } else {
        println!(
            "Feasible: NO (all remaining topics together fall short by {:.1} marks)",
            -s.margin
        );
    }
    if !s.unmatched_studied_topics.is_empty() {
        println!(
            "Unknown studied topics: {}",
            s.unmatched_studied_topics.join(", ")
        );
    }
}
