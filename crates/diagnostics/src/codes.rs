//! Diagnostic ID constants.
//!
//! Generated from `data/diagnostics.json` at build time. Codes `BHV1xxx` are
//! structural (terminal for their line), codes `BHV2xxx` are reference errors
//! (cumulative).

include!(concat!(env!("OUT_DIR"), "/generated_codes.rs"));
