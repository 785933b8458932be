//! The `passpilot simulate` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use passpilot_core::simulation::SimulationResult;

use super::{build_analyzer, GlobalArgs};
use crate::inputs::{PassArgs, PassInputs};

#[derive(Serialize)]
struct SimulationOutput {
    #[serde(flatten)]
    simulation: SimulationResult,
    inputs: PassInputs,
}

pub fn execute(
    global: &GlobalArgs,
    args: PassArgs,
    trials: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let (config, analyzer) = build_analyzer(global)?;
    let inputs = PassInputs::from_args(&args, &config.pass_rules)?;

    let mut sim_config = config.simulation.to_config();
    if let Some(trials) = trials {
        sim_config.trials = trials;
    }
    if seed.is_some() {
        sim_config.seed = seed;
    }

    let simulation = analyzer.pass_simulation(
        &inputs.studied_topics,
        inputs.calculated_target_marks,
        &sim_config,
    )?;
    let output = SimulationOutput { simulation, inputs };
    global.emit("simulate", &config, &output, print_simulation)
}

fn print_simulation(output: &SimulationOutput) {
    let s = &output.simulation;
    println!(
        "Target external marks: {:.1} ({} trials, seed {})",
        s.target_marks, s.trials, s.seed
    );
    println!("Pass probability: {:.1}%", s.pass_probability * 100.0);
    println!(
        "Score: mean {:.1}, std dev {:.1}, min {:.1}, max {:.1}",
        s.mean_score, s.std_dev, s.min_score, s.max_score
    );
    println!(
        "Percentiles: p10 {:.1}, p50 {:.1}, p90 {:.1}",
        s.percentiles.p10, s.percentiles.p50, s.percentiles.p90
    );

    if !s.topics.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Topic", "Avg Marks", "P(mastered)", "Studied"]);
        for t in &s.topics {
            table.add_row(vec![
                Cell::new(&t.topic),
                Cell::new(format!("{:.1}", t.average_marks)),
                Cell::new(format!("{:.2}", t.probability)),
                Cell::new(if t.studied { "yes" } else { "" }),
            ]);
        }
        println!("{table}");
    }

    if !s.unmatched_studied_topics.is_empty() {
        println!(
            "Unknown studied topics: {}",
            s.unmatched_studied_topics.join(", ")
        );
    }
}
