//! Textual shape checks for replacement content.
//!
//! These checks are intentionally shallow: they catch obviously wrong input
//! (a type body passed as a function, an empty string) before any splice.
//! Syntactic correctness is only guaranteed by the post-splice re-parse.

use regex::Regex;

use super::PartType;
use crate::error::{Error, Result};

/// Maximum number of characters shown in an error preview.
const PREVIEW_LEN: usize = 50;

lazy_static::lazy_static! {
    static ref FUNC_START: Regex = Regex::new(r"^func[\s(]").unwrap();
    static ref TYPE_START: Regex = Regex::new(r"^type[\s(]").unwrap();
    static ref CONST_START: Regex = Regex::new(r"^const[\s(]").unwrap();
    static ref VAR_START: Regex = Regex::new(r"^var[\s(]").unwrap();
    static ref PACKAGE_START: Regex = Regex::new(r"^package\s").unwrap();
    static ref IMPORT_KEYWORD: Regex = Regex::new(r"\bimport\b").unwrap();
    static ref QUOTED_PATH: Regex = Regex::new(r#""[^"\n]*"|`[^`]*`"#).unwrap();
}

/// Check that `content` has the minimal shape expected for `part_type`.
pub fn validate(part_type: PartType, content: &str) -> Result<()> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(shape_error(part_type, "content is empty", content));
    }

    let ok = match part_type {
        PartType::Func => FUNC_START.is_match(trimmed),
        PartType::Type => TYPE_START.is_match(trimmed),
        PartType::Const => trimmed.contains('=') || CONST_START.is_match(trimmed),
        PartType::Var => trimmed.contains('=') || VAR_START.is_match(trimmed),
        PartType::Import => IMPORT_KEYWORD.is_match(trimmed) || QUOTED_PATH.is_match(trimmed),
        PartType::Package => PACKAGE_START.is_match(trimmed),
    };

    if ok {
        Ok(())
    } else {
        Err(shape_error(part_type, expectation(part_type), content))
    }
}

fn expectation(part_type: PartType) -> &'static str {
    match part_type {
        PartType::Func => "must start with 'func'",
        PartType::Type => "must start with 'type'",
        PartType::Const => "must contain '=' or start with 'const'",
        PartType::Var => "must contain '=' or start with 'var'",
        PartType::Import => "must contain 'import' or a quoted path",
        PartType::Package => "must start with 'package'",
    }
}

fn shape_error(part_type: PartType, message: &str, content: &str) -> Error {
    Error::ContentShape {
        kind: part_type.to_string(),
        message: message.to_string(),
        preview: preview(content),
    }
}

/// Truncate content for display in error messages.
pub fn preview(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= PREVIEW_LEN {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(PREVIEW_LEN).collect();
    format!("{}...", head)
}
