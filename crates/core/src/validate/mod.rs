mod assignment;
mod context;
mod diagnostics_util;
mod forwarding;

pub use crate::grammar::diag::Diagnostic;
pub use context::{BehaviorNode, OutputPort, PortContext, PortError};

use crate::config::ValidatorConfig;
use crate::grammar::{ast::LineKind, diag::codes, lexer::tokenize, parser::classify_line};
use context::{LineCtx, ValidationContext};
use dfd_behavior_catalog::LabelCatalog;
use tracing::{debug, instrument};

/// Validates the behavior text of output ports.
///
/// Holds only read-only configuration and an optional borrowed label
/// catalog, so one validator can be shared across threads and calls.
///
/// ```
/// use dfd_behavior_core::{BehaviorValidator, PortContext, ValidatorConfig};
///
/// let validator = BehaviorValidator::new(ValidatorConfig::default());
/// let port = PortContext::new(["a"]);
/// let diags = validator.validate("Forwarding({a,a})", &port).unwrap();
/// assert_eq!(diags.len(), 2);
/// assert_eq!(diags[0].message, "duplicate input: a");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviorValidator<'c> {
    config: ValidatorConfig,
    catalog: Option<&'c LabelCatalog>,
}

impl<'c> BehaviorValidator<'c> {
    /// Validator without a label catalog; label checks are skipped.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    /// Resolve label accesses against `catalog`.
    pub fn with_catalog(mut self, catalog: &'c LabelCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate every line of `text` for the given output port.
    ///
    /// Lines are split on `'\n'` and numbered from 0; nothing is trimmed.
    /// Diagnostics come back in line order, each with resolved columns.
    /// A port without a parent node is a caller error and aborts the whole
    /// call as soon as a line needs the node's inputs.
    #[instrument(skip_all, fields(lines = tracing::field::Empty))]
    pub fn validate(
        &self,
        text: &str,
        port: &dyn OutputPort,
    ) -> Result<Vec<Diagnostic>, PortError> {
        let mut vctx = ValidationContext::new(&self.config, self.catalog, port);
        let mut diagnostics = Vec::new();
        let mut line_count = 0usize;

        for (line_no, text) in text.split('\n').enumerate() {
            line_count += 1;
            let kind = classify_line(text);
            debug!(line = line_no, ?kind, "classified line");
            if matches!(kind, LineKind::Blank | LineKind::Comment) {
                continue;
            }

            let toks = tokenize(text);
            let line = LineCtx {
                text,
                line_no,
                toks: &toks,
            };
            let mut found = match kind {
                LineKind::Blank | LineKind::Comment => Vec::new(),
                LineKind::Forwarding => forwarding::validate_forwarding(line, &mut vctx)?,
                LineKind::Assignment => assignment::validate_assignment(line, &mut vctx)?,
                LineKind::Unknown => vec![line.diagnostic(
                    codes::UNKNOWN_STATEMENT,
                    "Unknown statement",
                    None,
                )],
            };

            let line_len = text.chars().count();
            for diag in &mut found {
                diag.resolve_columns(line_len);
            }
            if !found.is_empty() {
                debug!(line = line_no, count = found.len(), "line has diagnostics");
            }
            diagnostics.append(&mut found);
        }

        tracing::Span::current().record("lines", line_count);
        Ok(diagnostics)
    }
}

/// Validate `text` with the default configuration.
///
/// Shorthand for `BehaviorValidator::new(ValidatorConfig::default())`
/// with `catalog` attached when present.
pub fn validate_behavior(
    text: &str,
    port: &dyn OutputPort,
    catalog: Option<&LabelCatalog>,
) -> Result<Vec<Diagnostic>, PortError> {
    let mut validator = BehaviorValidator::new(ValidatorConfig::default());
    if let Some(catalog) = catalog {
        validator = validator.with_catalog(catalog);
    }
    validator.validate(text, port)
}
