//! Document display-code parsing.
//!
//! Codes are a one-letter prefix (`M` matrícula, `T` transcrição) followed
//! by a number that may contain separators ("M 1.234", "T-45").

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ChainError;
use crate::model::{Document, DocumentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CodePrefix {
    M,
    T,
}

impl CodePrefix {
    pub fn kind(self) -> DocumentKind {
        match self {
            CodePrefix::M => DocumentKind::Matricula,
            CodePrefix::T => DocumentKind::Transcricao,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentCode {
    pub prefix: CodePrefix,
    pub number: u64,
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([MmTt])[\s.\-/]*(\d[\d\s.\-/]*)$").expect("static pattern compiles")
    })
}

/// Parse a display code into prefix and number.
pub fn parse_document_code(code: &str) -> Result<DocumentCode, ChainError> {
    let invalid = || ChainError::InvalidCode {
        code: code.to_string(),
    };
    let caps = code_pattern().captures(code.trim_end()).ok_or_else(invalid)?;
    let prefix = match &caps[1] {
        "M" | "m" => CodePrefix::M,
        _ => CodePrefix::T,
    };
    let digits: String = caps[2].chars().filter(char::is_ascii_digit).collect();
    let number = digits.parse::<u64>().map_err(|_| invalid())?;
    Ok(DocumentCode { prefix, number })
}

/// Numeric part used for sibling ordering: every digit in the code, or 0
/// when there are none.
///
/// Codes without a recognised prefix still sort by their digits; only a code
/// with no usable number falls back to 0.
pub fn sort_number(code: &str) -> Option<u64> {
    match parse_document_code(code) {
        Ok(parsed) => Some(parsed.number),
        Err(_) => {
            let digits: String = code.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        }
    }
}

/// Sibling order: matrículas before transcrições, then number descending.
/// Equal keys compare equal so a stable sort keeps input order.
pub fn sibling_order(a: &Document, b: &Document) -> Ordering {
    a.tipo.rank().cmp(&b.tipo.rank()).then_with(|| {
        let na = sort_number(&a.numero).unwrap_or(0);
        let nb = sort_number(&b.numero).unwrap_or(0);
        nb.cmp(&na)
    })
}

#[cfg(test)]
#[path = "../../tests/rust/test_parsers_code.rs"]
mod tests;
