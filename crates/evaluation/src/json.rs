//! Extraction of JSON payloads from judge completions
//!
//! Judge models wrap their JSON in markdown fences or chatty preambles often
//! enough that the raw completion cannot be handed to serde directly.

use crate::error::{EvaluationError, Result};
use crate::llm::ChatModel;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::warn;

const FENCE: &str = "```";

/// Bodies of the markdown code blocks in `response`, in order.
///
/// The info string after an opening fence (`json`, `JSON`, ...) is skipped. An
/// unclosed block runs to the end of the response.
fn fenced_blocks(response: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = response;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let body_start = after_open
            .find('\n')
            .map_or(after_open.len(), |newline| newline + 1);
        let body = &after_open[body_start..];

        match body.find(FENCE) {
            Some(close) => {
                blocks.push(body[..close].trim());
                rest = &body[close + FENCE.len()..];
            }
            None => {
                blocks.push(body.trim());
                break;
            }
        }
    }

    blocks
}

/// Extract the balanced JSON structure starting at byte offset `start_pos`.
fn extract_balanced_at(content: &str, start_pos: usize) -> Option<&str> {
    let json_content = content.get(start_pos..)?;
    let start_char = json_content.chars().next()?;
    let end_char = match start_char {
        '{' => '}',
        '[' => ']',
        _ => return None,
    };

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in json_content.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == start_char => depth += 1,
            c if c == end_char => {
                depth -= 1;
                if depth == 0 {
                    return Some(&json_content[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn is_valid_json(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Extract JSON from an LLM response, stripping markdown and extraneous text.
///
/// Returns the first balanced object or array, by position, that parses.
pub(crate) fn extract_json(response: &str) -> Option<&str> {
    // Fenced blocks first, then the raw response
    fenced_blocks(response)
        .into_iter()
        .chain(std::iter::once(response))
        .find_map(first_json_in)
}

fn first_json_in(content: &str) -> Option<&str> {
    content
        .match_indices(['{', '['])
        .map(|(i, _)| i)
        .filter_map(|pos| extract_balanced_at(content, pos))
        .find(|json| is_valid_json(json))
}

/// Parse a judge completion into `T`
pub(crate) fn parse_judge_output<T: DeserializeOwned>(response: &str) -> Result<T> {
    let json = extract_json(response).ok_or_else(|| {
        EvaluationError::InvalidJudgeOutput(format!("No JSON found in: {}", preview(response)))
    })?;
    serde_json::from_str(json).map_err(|e| EvaluationError::InvalidJudgeOutput(e.to_string()))
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Chat model wrapper that asks for JSON and re-prompts on unparsable output
#[derive(Clone)]
pub struct Judge {
    model: Arc<dyn ChatModel>,
    parse_attempts: usize,
}

impl Judge {
    /// `retry_attempts` extra prompts are sent after an unparsable answer
    pub fn new(model: Arc<dyn ChatModel>, retry_attempts: usize) -> Self {
        Self {
            model,
            parse_attempts: retry_attempts + 1,
        }
    }

    pub async fn ask<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
        let mut last_error = None;
        for attempt in 1..=self.parse_attempts {
            let completion = self.model.complete(prompt).await?;
            match parse_judge_output(&completion) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    warn!(
                        "Unparsable judge output (attempt {attempt}/{}): {e}",
                        self.parse_attempts
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            EvaluationError::InvalidJudgeOutput("No attempts were made".to_string())
        }))
    }
}

/// Binary judge verdict. Accepts `1`/`0`, booleans and their string forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Verdict(pub bool);

impl Verdict {
    pub(crate) fn as_f64(self) -> f64 {
        if self.0 {
            1.0
        } else {
            0.0
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Float(f64),
            Text(String),
        }

        let positive = match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(i) => i != 0,
            Raw::Float(f) => f >= 0.5,
            Raw::Text(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "1" | "yes" | "true"
            ),
        };
        Ok(Verdict(positive))
    }
}
