//! JSON question corpus loader.
//!
//! Loads exam questions from a directory of JSON files. A file may contain a
//! single record, an array of records, or an object with a `questions` array.
//! Malformed records and unreadable files are skipped and recorded as
//! [`LoadWarning`]s; they never abort the load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Corpus, LoadWarning, Question};

/// Intermediate structure for one question record.
#[derive(Debug, Deserialize)]
struct JsonQuestion {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "module_id", alias = "course", alias = "course_code")]
    module: Option<Value>,
    #[serde(default, alias = "text", alias = "question_text")]
    question: Option<Value>,
    #[serde(default, alias = "topic_label")]
    topic: Option<Value>,
    #[serde(default, alias = "mark")]
    marks: Option<Value>,
    #[serde(default, alias = "term")]
    year: Option<Value>,
}

/// Batch layout: `{ "questions": [ ... ] }`.
#[derive(Debug, Deserialize)]
struct JsonBatch {
    questions: Vec<Value>,
}

/// Load every `.json` file under `dir` into a new corpus.
///
/// A missing directory yields an empty corpus; the caller decides whether
/// that makes the analyzer unusable.
pub fn load_corpus(dir: &Path) -> Corpus {
    let mut corpus = Corpus::default();
    corpus.reload(dir);
    corpus
}

impl Corpus {
    /// Replace the corpus contents with the questions found under `dir`.
    ///
    /// Returns the number of questions loaded.
    pub fn reload(&mut self, dir: &Path) -> usize {
        let mut questions = Vec::new();
        let mut warnings = Vec::new();
        let mut rejected = 0usize;

        if !dir.is_dir() {
            tracing::warn!("data directory {} not found, no questions loaded", dir.display());
            *self = Corpus::default();
            return 0;
        }

        let mut files = Vec::new();
        if let Err(e) = collect_json_files(dir, &mut files) {
            tracing::warn!("failed to list {}: {:#}", dir.display(), e);
            warnings.push(LoadWarning {
                path: dir.to_path_buf(),
                record: None,
                message: format!("{e:#}"),
            });
        }
        files.sort();

        let mut seen_ids = HashSet::new();
        for path in &files {
            let records = match read_records(path) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                    warnings.push(LoadWarning {
                        path: path.clone(),
                        record: None,
                        message: format!("{e:#}"),
                    });
                    continue;
                }
            };

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "question".to_string());

            for (idx, record) in records.into_iter().enumerate() {
                let parsed = parse_question(record, &stem, idx).and_then(|q| {
                    if seen_ids.insert(q.id.clone()) {
                        Ok(q)
                    } else {
                        Err(format!("duplicate question id: {}", q.id))
                    }
                });
                match parsed {
                    Ok(q) => questions.push(q),
                    Err(message) => {
                        tracing::debug!("rejected record {idx} in {}: {message}", path.display());
                        rejected += 1;
                        warnings.push(LoadWarning {
                            path: path.clone(),
                            record: Some(idx),
                            message,
                        });
                    }
                }
            }
        }

        if rejected > 0 {
            tracing::warn!("{rejected} malformed record(s) skipped");
        }
        tracing::info!(
            "loaded {} question(s) from {} file(s) in {}",
            questions.len(),
            files.len(),
            dir.display()
        );

        let loaded = questions.len();
        *self = Corpus::from_parts(questions, rejected, warnings);
        loaded
    }
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are skipped; they can loop back to an ancestor.
        if entry.file_type()?.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

/// Read a file and split it into raw records.
fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    parse_records_str(&content, path)
}

/// Split a JSON document into raw records (useful for testing).
pub fn parse_records_str(content: &str, source_path: &Path) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    match value {
        Value::Array(records) => Ok(records),
        Value::Object(ref map) if map.contains_key("questions") => {
            let batch: JsonBatch = serde_json::from_value(value)
                .with_context(|| format!("invalid questions array: {}", source_path.display()))?;
            Ok(batch.questions)
        }
        Value::Object(_) => Ok(vec![value]),
        other => anyhow::bail!(
            "expected an object or array of questions, found {}",
            json_kind(&other)
        ),
    }
}

/// Validate and normalize one raw record.
fn parse_question(record: Value, stem: &str, idx: usize) -> Result<Question, String> {
    let raw: JsonQuestion = serde_json::from_value(record).map_err(|e| e.to_string())?;

    let module = text_field(raw.module, "module")?.ok_or("missing module")?;
    let text = text_field(raw.question, "question")?.ok_or("missing question text")?;
    let marks = parse_marks(raw.marks)?;
    let topic = text_field(raw.topic, "topic")?;
    let year = text_field(raw.year, "year")?;
    let id = text_field(raw.id, "id")?.unwrap_or_else(|| format!("{stem}-{}", idx + 1));

    Ok(Question {
        id,
        module,
        text,
        topic,
        marks,
        year,
        embedding: None,
    })
}

/// Read an optional string-like field. Numbers are accepted and rendered as
/// text; blank strings and `null` count as absent.
fn text_field(value: Option<Value>, field: &str) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(format!("{field} must be a string, found {}", json_kind(&other))),
    }
}

fn parse_marks(value: Option<Value>) -> Result<u32, String> {
    let marks = match value {
        None | Some(Value::Null) => return Err("missing marks".into()),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
            (Some(m), _) => m,
            (None, Some(f)) if f.fract() == 0.0 && f > 0.0 && f <= f64::from(u32::MAX) => f as u64,
            _ => return Err(format!("marks must be a positive integer, found {n}")),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("marks must be a positive integer, found {s:?}"))?,
        Some(other) => return Err(format!("marks must be a number, found {}", json_kind(&other))),
    };

    match u32::try_from(marks) {
        Ok(0) => Err("marks must be positive".into()),
        Ok(m) => Ok(m),
        Err(_) => Err(format!("marks out of range: {marks}")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
