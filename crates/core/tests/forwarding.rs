//! Forwarding statement tests: template matching, separator errors,
//! duplicates and input availability.

mod common;

use common::{check, messages, positions};
use dfd_behavior_core::codes;

const DUPLICATE_A: &str = "duplicate input: a";
const TRAILING: &str = "trailing comma without being followed by an input";

// ─── Valid statements ───────────────────────────────────────────────────────

#[test]
fn distinct_available_inputs_are_clean() {
    for line in [
        "Forwarding({a})",
        "Forwarding({a,b})",
        "Forwarding({ a , b })",
        "Forwarding({in_1, in|2})",
    ] {
        let diags = check(line, &["a", "b", "in_1", "in|2"]);
        assert!(diags.is_empty(), "{line}: {diags:?}");
    }
}

// ─── Template ───────────────────────────────────────────────────────────────

#[test]
fn malformed_forwarding_is_one_whole_line_error() {
    for line in [
        "Forwarding",
        "Forwarding()",
        "Forwarding(a)",
        "Forwarding({a}) # trailing",
        "Forwarding({a};",
        "Forwarding({a.b})",
        "Forwardingx({a})",
    ] {
        let diags = check(line, &["a"]);
        assert_eq!(diags.len(), 1, "{line}: {diags:?}");
        assert_eq!(diags[0].id, codes::INVALID_FORWARDING);
        assert_eq!(
            diags[0].message,
            "invalid forwarding(Template:Forwarding({in_ports})"
        );
        assert_eq!(diags[0].columns(), Some((0, line.chars().count())));
    }
}

// ─── Separators ─────────────────────────────────────────────────────────────

#[test]
fn empty_braces_need_an_input() {
    for line in ["Forwarding({})", "Forwarding({  })", "Forwarding({,})"] {
        let diags = check(line, &[]);
        assert_eq!(messages(&diags), vec!["forward needs at least one input"], "{line}");
    }
}

#[test]
fn trailing_comma_is_reported_at_the_comma() {
    let diags = check("Forwarding({a,})", &["a"]);
    assert_eq!(messages(&diags), vec![TRAILING]);
    assert_eq!(positions(&diags), vec![(0, 13, 14)]);
}

#[test]
fn leading_comma_is_reported_at_the_first_comma() {
    let diags = check("Forwarding({ , a})", &["a"]);
    assert_eq!(messages(&diags), vec![TRAILING]);
    assert_eq!(positions(&diags), vec![(0, 13, 14)]);
}

#[test]
fn only_the_first_empty_item_is_reported() {
    let diags = check("Forwarding({a,,b,})", &["a", "b"]);
    assert_eq!(positions(&diags), vec![(0, 13, 14)]);
}

#[test]
fn separator_errors_win_over_duplicates() {
    let diags = check("Forwarding({a,a,})", &["a"]);
    assert_eq!(messages(&diags), vec![TRAILING]);
}

// ─── Duplicates ─────────────────────────────────────────────────────────────

#[test]
fn each_duplicate_occurrence_is_reported() {
    let diags = check("Forwarding({a,a})", &["a"]);
    assert_eq!(messages(&diags), vec![DUPLICATE_A, DUPLICATE_A]);
    assert_eq!(positions(&diags), vec![(0, 12, 13), (0, 14, 15)]);
}

#[test]
fn duplicates_are_grouped_by_first_appearance() {
    let diags = check("Forwarding({b, a, b, a, b})", &["a", "b"]);
    assert_eq!(
        messages(&diags),
        vec![
            "duplicate input: b",
            "duplicate input: b",
            "duplicate input: b",
            DUPLICATE_A,
            DUPLICATE_A,
        ]
    );
    assert_eq!(diags[0].columns(), Some((12, 13)));
    assert_eq!(diags[3].columns(), Some((15, 16)));
}

#[test]
fn duplicate_is_not_confused_with_longer_names() {
    let diags = check("Forwarding({a, ab, a|x, a})", &["a", "ab", "a|x"]);
    assert_eq!(positions(&diags), vec![(0, 12, 13), (0, 24, 25)]);
}

#[test]
fn duplicates_suppress_unknown_input_errors() {
    let diags = check("Forwarding({a, a, missing})", &["a"]);
    assert_eq!(messages(&diags), vec![DUPLICATE_A, DUPLICATE_A]);
}

// ─── Availability ───────────────────────────────────────────────────────────

#[test]
fn unknown_inputs_are_reported_at_their_position() {
    let diags = check("Forwarding({in, x, other})", &["in"]);
    assert_eq!(
        messages(&diags),
        vec!["invalid/unknown input: x", "invalid/unknown input: other"]
    );
    assert_eq!(positions(&diags), vec![(0, 16, 17), (0, 19, 24)]);
    assert!(diags.iter().all(|d| d.id == codes::UNKNOWN_INPUT));
}

#[test]
fn input_names_are_case_sensitive() {
    let diags = check("Forwarding({In})", &["in"]);
    assert_eq!(messages(&diags), vec!["invalid/unknown input: In"]);
}
