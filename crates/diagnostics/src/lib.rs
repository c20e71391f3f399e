//! Diagnostics for dataflow port behavior validation.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Span`] used to report findings
//! of the behavior validator. Diagnostic codes are defined in the [`codes`]
//! module.

#![warn(missing_docs)]

/// Diagnostic ID constants generated from `data/diagnostics.json`.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the behavior text is invalid.
    Error,
    /// Warning: the behavior text may not do what was intended.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span inside a single line of behavior text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` for a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Convert a byte span inside `line` to 0-based character columns.
///
/// Offsets past the end of the line or inside a multi-byte character are
/// clamped to the nearest preceding character boundary.
pub fn char_columns(line: &str, span: Span) -> (usize, usize) {
    (char_column(line, span.start), char_column(line, span.end))
}

fn char_column(line: &str, byte: usize) -> usize {
    let mut offset = byte.min(line.len());
    while !line.is_char_boundary(offset) {
        offset -= 1;
    }
    line[..offset].chars().count()
}

/// A validation finding addressed to one line of behavior text.
///
/// `line` is 0-based. `col_start`/`col_end` are 0-based character offsets
/// into that line; they may be absent while a line is being validated and
/// are always present in diagnostics returned by the validator (see
/// [`Diagnostic::resolve_columns`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"BHV2001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// 0-based line number.
    pub line: usize,
    /// First highlighted character column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_start: Option<usize>,
    /// Column one past the last highlighted character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_end: Option<usize>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic for `line` without a column range.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            line,
            col_start: None,
            col_end: None,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::new(id, Severity::Error, message, line)
    }

    /// Pin the diagnostic to the character columns `[start, end)`.
    pub fn with_columns(mut self, start: usize, end: usize) -> Self {
        self.col_start = Some(start);
        self.col_end = Some(end);
        self
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Fill absent columns with the whole line: `0` and `line_len`.
    pub fn resolve_columns(&mut self, line_len: usize) {
        self.col_start.get_or_insert(0);
        self.col_end.get_or_insert(line_len);
    }

    /// The `[start, end)` column range, once both ends are known.
    pub fn columns(&self) -> Option<(usize, usize)> {
        Some((self.col_start?, self.col_end?))
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}] line {}", self.severity, self.id, self.line + 1)?;
        if let Some((start, end)) = self.columns() {
            write!(f, ", cols {}-{}", start + 1, end)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

/// Default severity of a diagnostic code, if known.
pub fn severity_for_code(id: &str) -> Option<Severity> {
    include!(concat!(env!("OUT_DIR"), "/generated_severity.rs"))
}

/// Message template for a diagnostic code and variant (e.g. `"default"`).
///
/// Templates use `{key}` placeholders naming context keys.
pub fn message_template_for(id: &str, variant: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_templates.rs"))
}
