//! Shared logic for dataflow behavior validator language bindings.
//!
//! Contains the JSON-facing workflows for validate and explain. Each binding
//! crate wraps these functions with its own type conversion layer; errors
//! cross the boundary as plain strings.

use dfd_behavior_catalog::{LabelCatalog, load_catalog_from_diagram_str, load_catalog_from_str};
use dfd_behavior_core::{
    BehaviorValidator, Diagnostic, PortContext, Severity, ValidatorConfig, load_config_from_str,
};
use serde::Serialize;

/// Outcome of validating one behavior text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorReport {
    /// `true` if no error-level diagnostic was produced.
    pub ok: bool,
    /// All diagnostics, in line order.
    pub diagnostics: Vec<Diagnostic>,
}

impl BehaviorReport {
    fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            ok: !diagnostics.iter().any(|d| d.severity == Severity::Error),
            diagnostics,
        }
    }
}

// ── Catalog / config ────────────────────────────────────────────────────

/// Load a label catalog from JSON.
///
/// Accepts either a bare array of label types or a saved diagram carrying a
/// `labelTypes` array. A diagram without label types yields `None`.
pub fn parse_catalog_json(json: &str) -> Result<Option<LabelCatalog>, String> {
    let result = if json.trim_start().starts_with('[') {
        load_catalog_from_str(json).map(Some)
    } else {
        load_catalog_from_diagram_str(json)
    };
    result.map_err(|e| format!("invalid label catalog: {}", e))
}

/// Load a validator configuration from JSON, or the default when absent.
pub fn parse_config_json(json: Option<&str>) -> Result<ValidatorConfig, String> {
    match json {
        Some(json) => load_config_from_str(json).map_err(|e| format!("invalid config: {}", e)),
        None => Ok(ValidatorConfig::default()),
    }
}

// ── Validate ────────────────────────────────────────────────────────────

/// Validate behavior text for a port whose node has the given inputs.
///
/// `catalog_json` and `config_json` are optional; see [`parse_catalog_json`]
/// and [`parse_config_json`].
pub fn validate_behavior_json(
    text: &str,
    available_inputs: &[String],
    catalog_json: Option<&str>,
    config_json: Option<&str>,
) -> Result<BehaviorReport, String> {
    let config = parse_config_json(config_json)?;
    let catalog = catalog_json.map(parse_catalog_json).transpose()?.flatten();
    let port = PortContext::new(available_inputs.iter().cloned());

    let mut validator = BehaviorValidator::new(config);
    if let Some(catalog) = catalog.as_ref() {
        validator = validator.with_catalog(catalog);
    }
    let diagnostics = validator.validate(text, &port).map_err(|e| e.to_string())?;
    Ok(BehaviorReport::new(diagnostics))
}

// ── Explain ─────────────────────────────────────────────────────────────

/// Explain a diagnostic code, returning the human-readable description.
pub fn explain_diagnostic(id: &str) -> Option<&'static str> {
    dfd_behavior_diagnostics::explain(id)
}
