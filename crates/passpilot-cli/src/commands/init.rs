//! The `passpilot init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("passpilot.toml").exists() {
        println!("passpilot.toml already exists, skipping.");
    } else {
        std::fs::write("passpilot.toml", SAMPLE_CONFIG)?;
        println!("Created passpilot.toml");
    }

    std::fs::create_dir_all("exam_data")?;
    let example_path = Path::new("exam_data/example.json");
    if example_path.exists() {
        println!("exam_data/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONS)?;
        println!("Created exam_data/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Add past exam questions as JSON files under exam_data/");
    println!("  2. Run: passpilot validate");
    println!("  3. Run: passpilot strategy --studied Arrays --internal-marks 30");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# passpilot configuration

data_dir = "./exam_data"

[embedding]
dimension = 512

[search]
similarity_threshold = 0.5
top_k = 20

[topics]
min_frequency = 2

[simulation]
trials = 10000
# seed = 42
mastery_floor = 0.35
mastery_ceiling = 0.85

[pass_rules]
external_pass_threshold = 40.0
overall_pass_threshold = 75.0
"#;

const EXAMPLE_QUESTIONS: &str = r#"[
  {
    "id": "example-1",
    "module": "CS201",
    "topic": "Arrays",
    "question": "Write an algorithm to reverse an array in place and state its time complexity.",
    "marks": 5,
    "year": "2023"
  },
  {
    "id": "example-2",
    "module": "CS201",
    "topic": "Sorting",
    "question": "Explain merge sort and trace it on the array [5, 2, 4, 6, 1, 3].",
    "marks": 10,
    "year": "2023"
  },
  {
    "id": "example-3",
    "module": "CS202",
    "topic": "Graphs",
    "question": "Describe breadth first search on an undirected graph.",
    "marks": 10,
    "year": "2022"
  }
]
"#;
