// src/reports/mod.rs
//! Psychometric report generators.
//!
//! Stateless: fill a template, make one blocking completion call, pull the
//! fenced JSON block out of the reply. No shared state with the chat side
//! beyond the completion backend itself.

pub mod prompts;

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{ChatMessage, CompletionBackend, CompletionError, CompletionOptions};

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced-json pattern"));

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("no fenced JSON block in model output")]
    MissingJson,
    #[error("malformed JSON in model output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub struct ReportService {
    backend: Arc<dyn CompletionBackend>,
}

impl ReportService {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// 大五人格报告。`answers` is the raw answers array from the request.
    pub async fn big_five(&self, answers: &[Value]) -> Result<Value, ReportError> {
        let answers_json = serde_json::to_string(answers)?;
        self.generate("big_five", prompts::big_five(&answers_json)).await
    }

    /// 核心价值观报告。
    pub async fn core_values(&self, answers: &[Value]) -> Result<Value, ReportError> {
        let answers_json = serde_json::to_string(answers)?;
        self.generate("core_values", prompts::core_values(&answers_json)).await
    }

    /// 综合心理画像，整合前两份报告。
    pub async fn holistic(
        &self,
        core_values_data: &Value,
        big_five_data: &Value,
    ) -> Result<Value, ReportError> {
        let core_values_json = serde_json::to_string_pretty(core_values_data)?;
        let big_five_json = serde_json::to_string_pretty(big_five_data)?;
        self.generate("holistic", prompts::holistic(&core_values_json, &big_five_json))
            .await
    }

    async fn generate(&self, kind: &str, prompt: String) -> Result<Value, ReportError> {
        let messages = vec![ChatMessage::user(prompt)];
        let completion = self
            .backend
            .complete(&messages, &CompletionOptions::default())
            .await
            .map_err(|e| {
                warn!(report = kind, error = %e, "report generation failed upstream");
                e
            })?;

        let data = parse_fenced_json(&completion.text)?;
        info!(report = kind, tokens = completion.tokens, "report generated");
        Ok(data)
    }
}

/// Extract and parse the first ```json fenced block from model output.
pub fn parse_fenced_json(text: &str) -> Result<Value, ReportError> {
    let captures = FENCED_JSON.captures(text).ok_or(ReportError::MissingJson)?;
    let json_str = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    Ok(serde_json::from_str(json_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_block() {
        let reply = "分析如下：\n```json\n{\"valueOrder\": [\"自主\"]}\n```\n谢谢。";
        let value = parse_fenced_json(reply).unwrap();
        assert_eq!(value["valueOrder"][0], "自主");
    }

    #[test]
    fn missing_fence_is_an_error() {
        let err = parse_fenced_json("{\"no\": \"fence\"}").unwrap_err();
        assert!(matches!(err, ReportError::MissingJson));
    }

    #[test]
    fn bad_json_inside_fence_is_an_error() {
        let err = parse_fenced_json("```json\n{broken\n```").unwrap_err();
        assert!(matches!(err, ReportError::InvalidJson(_)));
    }

    #[test]
    fn first_block_wins() {
        let reply = "```json\n{\"a\":1}\n```\n```json\n{\"b\":2}\n```";
        let value = parse_fenced_json(reply).unwrap();
        assert_eq!(value["a"], 1);
    }
}
