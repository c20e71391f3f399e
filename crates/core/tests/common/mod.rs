//! Shared test helpers for `dfd_behavior_core` integration tests.

#![allow(unreachable_pub)]

use dfd_behavior_core::{
    BehaviorValidator, Diagnostic, LabelCatalog, PortContext, ValidatorConfig,
};
use std::sync::LazyLock;

/// Label catalog shared by every test binary, built once via LazyLock.
pub static CATALOG: LazyLock<LabelCatalog> = LazyLock::new(|| {
    dfd_behavior_catalog::load_catalog_from_str(
        r#"[
            { "id": "t1", "name": "Sensitivity", "values": [
                { "id": "v1", "text": "Personal" },
                { "id": "v2", "text": "Public" }
            ]},
            { "id": "t2", "name": "Location", "values": [
                { "id": "v3", "text": "EU" },
                { "id": "v4", "text": "nonEU" }
            ]},
            { "id": "t3", "name": "Out", "values": [{ "id": "v5", "text": "v" }] }
        ]"#,
    )
    .unwrap_or_else(|e| panic!("test catalog is invalid: {e}"))
});

// ─── Validation helpers ──────────────────────────────────────────────────────

/// Validate with the default configuration and the shared catalog.
#[allow(dead_code)]
pub fn check(text: &str, inputs: &[&str]) -> Vec<Diagnostic> {
    let port = PortContext::new(inputs.iter().copied());
    BehaviorValidator::new(ValidatorConfig::default())
        .with_catalog(&CATALOG)
        .validate(text, &port)
        .unwrap_or_else(|e| panic!("validation failed: {e}"))
}

/// Validate with the default configuration and no catalog.
#[allow(dead_code)]
pub fn check_without_catalog(text: &str, inputs: &[&str]) -> Vec<Diagnostic> {
    let port = PortContext::new(inputs.iter().copied());
    dfd_behavior_core::validate_behavior(text, &port, None)
        .unwrap_or_else(|e| panic!("validation failed: {e}"))
}

/// Messages of `diags`, in order.
#[allow(dead_code)]
pub fn messages(diags: &[Diagnostic]) -> Vec<&str> {
    diags.iter().map(|d| d.message.as_str()).collect()
}

/// Resolved `(line, colStart, colEnd)` triples of `diags`, in order.
#[allow(dead_code)]
pub fn positions(diags: &[Diagnostic]) -> Vec<(usize, usize, usize)> {
    diags
        .iter()
        .map(|d| {
            let (start, end) = d
                .columns()
                .unwrap_or_else(|| panic!("unresolved columns in {d}"));
            (d.line, start, end)
        })
        .collect()
}

/// Assert that every diagnostic has a non-empty column range inside its line.
#[allow(dead_code)]
pub fn assert_spans_within(text: &str, diags: &[Diagnostic]) {
    let lines: Vec<&str> = text.split('\n').collect();
    for d in diags {
        let line_len = lines[d.line].chars().count();
        let (start, end) = d
            .columns()
            .unwrap_or_else(|| panic!("unresolved columns in {d}"));
        assert!(
            start < end && end <= line_len,
            "span {start}..{end} outside line {} (len {line_len}): {d}",
            d.line
        );
    }
}
