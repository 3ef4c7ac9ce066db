use log::{ debug, info };
use regex::Regex;

use crate::errors::{ SynthError, SynthResult };
use crate::implementations::scanner;
use crate::implementations::skeleton::{ self, SkeletonFormat };
use crate::models::contract::Contract;

const CLAUSE_KEYWORDS: [&str; 3] = ["requires", "ensures", "assignable"];

/// Reads the contract bound to one statement of a proof skeleton
#[derive(Debug, Clone, Copy)]
pub struct ContractExtractor {
    format: SkeletonFormat,
}

impl ContractExtractor {
    pub fn new(format: SkeletonFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SkeletonFormat {
        self.format
    }

    /// Extract precondition, postcondition and assignable clause of `statement_id`
    pub fn extract(&self, content: &str, statement_id: &str) -> SynthResult<Contract> {
        info!("Extracting contract of `{}` ({:?} skeleton)", statement_id, self.format);
        let contract = match self.format {
            SkeletonFormat::Jml => extract_jml(content, statement_id)?,
            SkeletonFormat::KeyProblem => extract_key(content, statement_id)?,
        };
        debug!("Precondition: {}", contract.precondition());
        debug!("Postcondition: {}", contract.postcondition());
        debug!("Assignable: {}", contract.assignable());
        Ok(contract)
    }
}

fn extract_jml(content: &str, statement_id: &str) -> SynthResult<Contract> {
    let span = skeleton::locate_method(content, statement_id).map_err(SynthError::ParseError)?;
    let block = &content[span.spec_block];

    let keyword = Regex::new(r"\b(requires|ensures|assignable)\b").map_err(|e|
        SynthError::ParseError(e.to_string())
    )?;
    let mut clauses: [Option<&str>; 3] = [None, None, None];
    let mut pos = 0;

    while let Some(caps) = keyword.captures_at(block, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if !starts_clause(block, whole.start()) {
            pos = whole.end();
            continue;
        }

        let kind = name.as_str();
        let end = scanner
            ::find_top_level(block, whole.end(), ";", |_| true)
            .map_err(|e| {
                SynthError::ParseError(
                    format!("unbalanced delimiters in `{}` clause of `{}`: {}", kind, statement_id, e)
                )
            })?
            .ok_or_else(|| {
                SynthError::ParseError(
                    format!("`{}` clause of `{}` is not terminated by `;`", kind, statement_id)
                )
            })?;

        let slot = CLAUSE_KEYWORDS.iter()
            .position(|k| *k == kind)
            .ok_or_else(|| SynthError::ParseError(format!("unknown clause `{}`", kind)))?;
        if clauses[slot].is_some() {
            return Err(
                SynthError::ParseError(
                    format!("`{}` clause appears twice in the specification of `{}`", kind, statement_id)
                )
            );
        }
        clauses[slot] = Some(block[whole.end()..end].trim());
        pos = end + 1;
    }

    let [requires, ensures, assignable] = clauses;
    let missing = |kind: &str| {
        SynthError::ParseError(format!("missing `{}` clause in the specification of `{}`", kind, statement_id))
    };

    Contract::new(
        statement_id,
        requires.ok_or_else(|| missing("requires"))?,
        ensures.ok_or_else(|| missing("ensures"))?,
        assignable.ok_or_else(|| missing("assignable"))?
    )
}

/// A keyword only opens a clause at the start of an annotation line or after
/// the previous clause's `;`
fn starts_clause(block: &str, at: usize) -> bool {
    block[..at]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace() || c == '@' || c == ';')
}

fn extract_key(content: &str, statement_id: &str) -> SynthResult<Contract> {
    let span = skeleton::locate_problem(content, statement_id).map_err(SynthError::ParseError)?;
    let pre_block = skeleton::clause_block(content, "pre").map_err(SynthError::ParseError)?;
    let post_block = skeleton::clause_block(content, "post").map_err(SynthError::ParseError)?;
    let (pre, post) = match (pre_block, post_block) {
        (Some(pre), Some(post)) => {
            debug!("Using explicit \\pre/\\post blocks for `{}`", statement_id);
            (pre, post)
        }
        _ => (span.pre, span.post),
    };

    let assignable = skeleton::marker(content, "mutable").ok_or_else(|| {
        SynthError::ParseError(
            format!("missing //mutable marker (assignable clause) for `{}`", statement_id)
        )
    })?;
    let loop_update = skeleton
        ::marker(content, "isLoopUpdate")
        .map_or(false, |v| v.eq_ignore_ascii_case("true"));

    Ok(
        Contract::new(
            statement_id,
            content[pre].trim(),
            content[post].trim(),
            assignable
        )?.with_loop_update(loop_update)
    )
}
