use super::context::LineCtx;
use crate::grammar::diag::{
    Diagnostic, Severity, Span, char_columns, message_template_for, severity_for_code,
};
use std::collections::BTreeMap;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
///
/// ```ignore
/// ctx!("labelType" => ty, "labelValue" => value)
/// ```
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.to_string(), $v.to_string())),+])
    };
}
pub(super) use ctx;

impl LineCtx<'_, '_> {
    /// Diagnostic on this line, highlighting `span` or the whole line.
    pub(super) fn diagnostic(
        &self,
        id: &'static str,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Diagnostic {
        let diag = Diagnostic::new(
            id,
            severity_for_code(id).unwrap_or(Severity::Error),
            message,
            self.line_no,
        );
        match span {
            Some(span) => {
                let (start, end) = char_columns(self.text, span);
                diag.with_columns(start, end)
            }
            None => diag,
        }
    }

    /// Diagnostic whose message is rendered from the code's default template
    /// with `context` substituted, and which carries `context`.
    pub(super) fn templated(
        &self,
        id: &'static str,
        context: BTreeMap<String, String>,
        span: Option<Span>,
    ) -> Diagnostic {
        let message = render_diagnostic_message(id, "default", &context);
        self.diagnostic(id, message, span).with_context(context)
    }
}

/// Fill a code's message template with context values.
///
/// Placeholders without a value are kept verbatim; a code without a
/// template renders as the code itself.
pub(super) fn render_diagnostic_message(
    id: &'static str,
    variant: &str,
    context: &BTreeMap<String, String>,
) -> String {
    let Some(template) = message_template_for(id, variant) else {
        return id.to_string();
    };
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            rendered.push_str(&rest[open..]);
            return rendered;
        };
        let key = &after_open[..close];
        match context.get(key) {
            Some(value) => rendered.push_str(value),
            None => rendered.push_str(&rest[open..open + close + 2]),
        }
        rest = &after_open[close + 1..];
    }
    rendered.push_str(rest);
    rendered
}

/// Append `diag` unless an identical one is already present.
pub(super) fn push_unique(out: &mut Vec<Diagnostic>, diag: Diagnostic) {
    if !out.contains(&diag) {
        out.push(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::diag::codes;

    #[test]
    fn renders_all_placeholders() {
        let msg = render_diagnostic_message(
            codes::UNKNOWN_LABEL_VALUE,
            "default",
            &ctx!("labelType" => "Sens", "labelValue" => "Secret"),
        );
        assert_eq!(msg, "unknown label value of label type Sens: Secret");
    }

    #[test]
    fn missing_value_keeps_placeholder() {
        let msg = render_diagnostic_message(
            codes::DUPLICATE_INPUT,
            "default",
            &ctx!("other" => "x"),
        );
        assert_eq!(msg, "duplicate input: {input}");
    }

    #[test]
    fn code_without_template_falls_back_to_id() {
        let msg = render_diagnostic_message(codes::UNKNOWN_STATEMENT, "default", &BTreeMap::new());
        assert_eq!(msg, codes::UNKNOWN_STATEMENT);
    }

    #[test]
    fn push_unique_skips_identical() {
        let d = Diagnostic::error(codes::INVALID_LABEL_DEFINITION, "invalid label definition", 0);
        let mut out = Vec::new();
        push_unique(&mut out, d.clone());
        push_unique(&mut out, d.clone().with_columns(0, 1));
        push_unique(&mut out, d);
        assert_eq!(out.len(), 2);
    }
}
