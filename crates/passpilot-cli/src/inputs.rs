//! Pass-target inputs shared by `strategy` and `simulate`.
//!
//! Raw arguments are validated here, before anything reaches the analyzer,
//! and turned into the external-marks target the analyzer works with.

use clap::Args;
use serde::Serialize;

use passpilot_core::config::PassRules;
use passpilot_core::error::AnalyzerError;

#[derive(Debug, Clone, Args)]
pub struct PassArgs {
    /// Topics already studied (comma-separated)
    #[arg(long)]
    pub studied: Option<String>,

    /// Internal marks already earned
    #[arg(long, default_value = "0")]
    pub internal_marks: f64,

    /// Minimum external exam marks (default from config: 40)
    #[arg(long)]
    pub external_pass_threshold: Option<f64>,

    /// Minimum internal + external total (default from config: 75)
    #[arg(long)]
    pub overall_pass_threshold: Option<f64>,
}

/// Validated inputs, echoed back alongside every result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassInputs {
    pub studied_topics: Vec<String>,
    pub internal_marks: f64,
    pub external_pass_threshold: f64,
    pub overall_pass_threshold: f64,
    pub calculated_target_marks: f64,
}

impl PassInputs {
    pub fn from_args(args: &PassArgs, rules: &PassRules) -> Result<Self, AnalyzerError> {
        let external = args
            .external_pass_threshold
            .unwrap_or(rules.external_pass_threshold);
        let overall = args
            .overall_pass_threshold
            .unwrap_or(rules.overall_pass_threshold);

        for (name, value) in [
            ("internal marks", args.internal_marks),
            ("external pass threshold", external),
            ("overall pass threshold", overall),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyzerError::InvalidInput(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let studied_topics = args
            .studied
            .as_deref()
            .map(parse_topic_list)
            .unwrap_or_default();

        Ok(Self {
            studied_topics,
            internal_marks: args.internal_marks,
            external_pass_threshold: external,
            overall_pass_threshold: overall,
            calculated_target_marks: target_external_marks(external, overall, args.internal_marks),
        })
    }
}

/// The external marks needed: at least the external threshold, and enough
/// to reach the overall threshold on top of internal marks.
pub fn target_external_marks(external: f64, overall: f64, internal: f64) -> f64 {
    external.max(overall - internal)
}

fn parse_topic_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
