pub use dfd_behavior_diagnostics::{
    Diagnostic, Severity, Span, char_columns, codes, explain, message_template_for,
    severity_for_code,
};
