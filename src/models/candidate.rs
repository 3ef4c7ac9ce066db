use serde::Serialize;

use crate::errors::OracleError;

/// Code fragment proposed by the oracle for one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSnippet {
    text: String,
    attempt_index: u32,
}

impl CandidateSnippet {
    pub fn new(text: impl Into<String>, attempt_index: u32) -> Self {
        Self {
            text: text.into(),
            attempt_index,
        }
    }

    /// Pull a single fragment out of a raw oracle response
    pub fn from_response(raw: &str, attempt_index: u32) -> Result<Self, OracleError> {
        extract_fragment(raw)
            .map(|text| Self::new(text, attempt_index))
            .ok_or(OracleError::EmptyOrMalformed)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attempt_index(&self) -> u32 {
        self.attempt_index
    }
}

/// Strip commentary and formatting around the code in an oracle response.
///
/// Tries, in order: a JSON object with a `java` or `code` field, the first
/// fenced block (a `java` block wins over an untagged one), then the bare
/// response if it reads like statements.
pub fn extract_fragment(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(code) = from_json(trimmed) {
        return non_empty(code);
    }

    if let Some(code) = from_fences(trimmed) {
        return non_empty(code);
    }

    if trimmed.contains(';') || trimmed.contains('}') {
        return Some(trimmed.to_string());
    }

    None
}

fn non_empty(code: String) -> Option<String> {
    let code = code.trim();
    if code.is_empty() { None } else { Some(code.to_string()) }
}

fn from_json(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&text[start..=end]).ok()?;
    let object = value.as_object()?;
    ["java", "code"]
        .iter()
        .find_map(|key| object.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

fn from_fences(text: &str) -> Option<String> {
    let mut blocks: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        let stripped = line.trim_start();
        if let Some(tag) = stripped.strip_prefix("```") {
            match current.take() {
                Some(block) => blocks.push(block),
                None => {
                    current = Some((tag.trim().to_lowercase(), String::new()));
                }
            }
            continue;
        }
        if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }

    // An unterminated fence still carries whatever code followed it
    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
        .iter()
        .find(|(tag, _)| tag == "java")
        .or_else(|| blocks.first())
        .map(|(_, body)| body.clone())
}
