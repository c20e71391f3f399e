//! Output port behavior validation for dataflow diagrams.
//!
//! A behavior is line-based text attached to an output port. Each line is
//! blank, a comment (`#` or `//`), a forwarding statement such as
//! `Forwarding({in1, in2})`, or an assignment such as
//! `Assignment({in}; !Sensitivity.Personal; {Sensitivity.Public})`.
//! [`BehaviorValidator::validate`] turns the text into line- and
//! column-addressed [`Diagnostic`]s.

#![warn(missing_docs)]

/// Validator configuration and its JSON loader.
pub mod config;
/// Behavior grammar: lexer, parsers, AST and token-boundary search.
pub mod grammar;
/// Statement validators and the per-call driver.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Configuration
pub use config::{ConfigError, ValidatorConfig, load_config_from_str};

// Grammar
pub use grammar::ast::LineKind;
pub use grammar::locate::{Boundary, locate_token};
pub use grammar::parser::{TermError, classify_line, parse_term, scan_term};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes, explain};

// Validator
pub use validate::{
    BehaviorNode, BehaviorValidator, OutputPort, PortContext, PortError, validate_behavior,
};

// Catalog (re-exported from the catalog crate)
pub use dfd_behavior_catalog::{LabelCatalog, LabelType, LabelTypeValue};
