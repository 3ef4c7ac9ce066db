//! Locating statements inside proof-skeleton files.
//!
//! Both the contract extractor and the splicer go through these functions so
//! that the clauses they read and the region they replace always belong to
//! the same statement.

use std::ops::Range;
use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::implementations::scanner;

/// Proof-skeleton flavours understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkeletonFormat {
    /// Java source with a JML specification block before each method
    Jml,
    /// KeY problem file with a `\problem { pre -> {u} \<{ body }\> post }` section
    KeyProblem,
}

impl SkeletonFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("key") => SkeletonFormat::KeyProblem,
            _ => SkeletonFormat::Jml,
        }
    }
}

/// Byte spans of a JML-annotated method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpan {
    /// Inside of the `/*@ ... */` block, delimiters excluded
    pub spec_block: Range<usize>,
    /// Method body, braces excluded
    pub body: Range<usize>,
}

/// Byte spans of a KeY `\problem` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSpan {
    pub pre: Range<usize>,
    /// Program inside the `\<{ ... }\>` modality
    pub body: Range<usize>,
    pub post: Range<usize>,
}

/// The placeholder region for `statement_id` in `content`
pub fn statement_body(
    content: &str,
    format: SkeletonFormat,
    statement_id: &str
) -> Result<Range<usize>, String> {
    match format {
        SkeletonFormat::Jml => locate_method(content, statement_id).map(|span| span.body),
        SkeletonFormat::KeyProblem => locate_problem(content, statement_id).map(|span| span.body),
    }
}

/// Find the declaration of method `name` and the JML block right before it
pub fn locate_method(content: &str, name: &str) -> Result<MethodSpan, String> {
    let pattern = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).map_err(|e|
        e.to_string()
    )?;

    for m in pattern.find_iter(content) {
        if is_member_access(content, m.start()) {
            continue;
        }
        let paren = m.end() - 1;
        let Ok(params_close) = scanner::matching_close(content, paren) else {
            continue;
        };

        let after_params = &content[params_close + 1..];
        let rest = skip_throws(after_params);
        if !rest.starts_with('{') {
            // A call site or an abstract declaration
            continue;
        }

        let body_open = params_close + 1 + (after_params.len() - rest.len());
        let body_close = scanner
            ::matching_close(content, body_open)
            .map_err(|e| format!("body of method `{}` is malformed: {}", name, e))?;
        let spec_block = spec_block_before(content, m.start(), name)?;

        return Ok(MethodSpan {
            spec_block,
            body: body_open + 1..body_close,
        });
    }

    Err(format!("statement `{}` not found: no method declaration with that name", name))
}

fn is_member_access(content: &str, start: usize) -> bool {
    content[..start].trim_end().ends_with('.')
}

fn skip_throws(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after) = trimmed.strip_prefix("throws") else {
        return trimmed;
    };
    if after.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return trimmed;
    }
    after
        .trim_start_matches(|c: char| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ',' | '<' | '>')
        })
}

fn spec_block_before(content: &str, name_start: usize, name: &str) -> Result<Range<usize>, String> {
    let prefix = &content[..name_start];
    let missing = || format!("no JML specification block precedes method `{}`", name);

    let end = prefix.rfind("*/").ok_or_else(missing)?;
    if prefix[end + 2..].contains([';', '{', '}']) {
        return Err(missing());
    }
    let start = prefix[..end].rfind("/*").ok_or_else(missing)?;
    if !prefix[start..].starts_with("/*@") {
        return Err(missing());
    }

    Ok(start + 3..end)
}

/// Find the `\problem` section of a KeY file bound to `statement_id`
pub fn locate_problem(content: &str, statement_id: &str) -> Result<ProblemSpan, String> {
    match marker(content, "statementid") {
        Some(id) if id == statement_id => {}
        Some(id) => {
            return Err(
                format!("statement `{}` not found: file is bound to `{}`", statement_id, id)
            );
        }
        None => {
            return Err(
                format!("statement `{}` not found: file has no //statementid marker", statement_id)
            );
        }
    }

    let keyword = content.find("\\problem").ok_or("no \\problem section")?;
    let after_keyword = keyword + "\\problem".len();
    let open = after_keyword + (content[after_keyword..].len() - content[after_keyword..].trim_start().len());
    if content.as_bytes().get(open) != Some(&b'{') {
        return Err("\\problem is not followed by `{`".to_string());
    }
    let close = scanner::matching_close(content, open)?;

    let arrow = scanner
        ::find_top_level(content, open + 1, "->", |i| content[i + 2..].trim_start().starts_with('{'))?
        .filter(|&i| i < close)
        .ok_or("no `-> {update}` after the precondition")?;

    let modality = content[arrow..close]
        .find("\\<{")
        .map(|i| arrow + i)
        .ok_or("no `\\<{` program modality in \\problem")?;
    let body_open = modality + 2;
    let body_close = scanner::matching_close(content, body_open)?;
    if !content[body_close + 1..].starts_with("\\>") {
        return Err("program modality is not closed by `}\\>`".to_string());
    }

    Ok(ProblemSpan {
        pre: open + 1..arrow,
        body: body_open + 1..body_close,
        post: body_close + 3..close,
    })
}

/// Inside of an explicit `\pre { ... }` or `\post { ... }` block, braces excluded
///
/// Occurrences after a `//` on the same line are comments and skipped.
pub fn clause_block(content: &str, keyword: &str) -> Result<Option<Range<usize>>, String> {
    let pattern = Regex::new(&format!(r"(?i)\\{}\s*\{{", regex::escape(keyword))).map_err(|e|
        e.to_string()
    )?;
    let Some(found) = pattern.find_iter(content).find(|m| !after_line_comment(content, m.start())) else {
        return Ok(None);
    };
    let open = found.end() - 1;
    let close = scanner::matching_close(content, open)?;
    Ok(Some(open + 1..close))
}

fn after_line_comment(content: &str, at: usize) -> bool {
    let line_start = content[..at].rfind('\n').map_or(0, |i| i + 1);
    content[line_start..at].contains("//")
}

/// Value of a `//name:{value}` marker comment
pub fn marker(content: &str, name: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"//\s*{}\s*:\s*\{{([^}}]*)\}}", regex::escape(name))).ok()?;
    pattern.captures(content).map(|c| c[1].trim().to_string())
}
