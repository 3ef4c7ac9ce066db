use std::ops::Range;

use crate::errors::{ SynthError, SynthResult };
use crate::implementations::scanner;
use crate::implementations::skeleton::{ self, SkeletonFormat };
use crate::models::candidate::CandidateSnippet;

/// Replaces the placeholder region of a statement with candidate code
#[derive(Debug, Clone)]
pub struct Splicer {
    format: SkeletonFormat,
    statement_id: String,
}

impl Splicer {
    pub fn new(format: SkeletonFormat, statement_id: impl Into<String>) -> Self {
        Self {
            format,
            statement_id: statement_id.into(),
        }
    }

    /// Byte range of the placeholder region in `content`
    pub fn region(&self, content: &str) -> SynthResult<Range<usize>> {
        skeleton::statement_body(content, self.format, &self.statement_id).map_err(|e| {
            SynthError::SpliceError(
                format!("cannot locate splice region of `{}`: {}", self.statement_id, e)
            )
        })
    }

    /// `base` with exactly the placeholder region replaced by the candidate text
    ///
    /// A candidate ending in a `//` comment gets a line break so the comment
    /// cannot swallow the closing delimiter.
    pub fn splice(&self, base: &str, candidate: &CandidateSnippet) -> SynthResult<String> {
        let region = self.region(base)?;
        let mut spliced = String::with_capacity(
            base.len() - region.len() + candidate.text().len() + 1
        );
        spliced.push_str(&base[..region.start]);
        spliced.push_str(candidate.text());
        if scanner::ends_in_line_comment(candidate.text()) {
            spliced.push('\n');
        }
        spliced.push_str(&base[region.end..]);
        Ok(spliced)
    }

    /// Current contents of the placeholder region
    pub fn read_region<'a>(&self, content: &'a str) -> SynthResult<&'a str> {
        let region = self.region(content)?;
        Ok(&content[region])
    }
}
