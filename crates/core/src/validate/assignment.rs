use super::context::{LineCtx, PortError, ValidationContext};
use super::diagnostics_util::{ctx, push_unique};
use super::forwarding::distinct;
use crate::grammar::{
    diag::{Diagnostic, Span, codes},
    lexer::{TokKind, Token},
    locate::{Boundary, locate_in, tokens_in},
    parser::{parse_assignment, scan_term},
};
use dfd_behavior_catalog::LabelCatalog;
use tracing::{debug, trace};

/// Validate a line starting with `Assignment`.
///
/// Steps up to the term parse are structural and stop at the first finding;
/// label and input checks afterwards accumulate.
pub(super) fn validate_assignment(
    line: LineCtx<'_, '_>,
    vctx: &mut ValidationContext<'_>,
) -> Result<Vec<Diagnostic>, PortError> {
    let Some(asg) = parse_assignment(line.text, line.toks, vctx.config.min_input_name_len) else {
        debug!(line = line.line_no, "assignment does not match template");
        return Ok(vec![line.diagnostic(
            codes::INVALID_ASSIGNMENT,
            "invalid assignment(Template:Assignment({in_ports}; term; {out_label})",
            None,
        )]);
    };

    if let Some(diag) = check_parens(line) {
        return Ok(vec![diag]);
    }

    if asg.term.text.trim().is_empty() {
        return Ok(vec![line.diagnostic(
            codes::MISSING_TERM,
            "invalid assignment: missing term",
            None,
        )]);
    }

    let labels = match scan_term(tokens_in(line.toks, asg.term.span)) {
        Ok(labels) => labels,
        Err(err) => {
            debug!(line = line.line_no, %err, "term rejected");
            return Ok(vec![line.diagnostic(codes::INVALID_TERM, "invalid term", None)]);
        }
    };

    let mut out = Vec::new();
    let label_region = tokens_in(line.toks, asg.label_span);

    if let Some(catalog) = vctx.catalog {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for label in &labels {
            let value = label.value.map_or("", |v| v.text);
            if seen.contains(&(label.label_type.text, value)) {
                continue;
            }
            seen.push((label.label_type.text, value));
            check_label(line, catalog, label.label_type.text, value, label_region, &mut out);
        }
    }

    let available = vctx.available_inputs()?;
    let input_region = tokens_in(line.toks, asg.input_span);
    for name in distinct(&asg.inputs) {
        if available.iter().any(|a| a == name) {
            continue;
        }
        let span = locate_in(input_region, name, Boundary::Plain)
            .first()
            .map(|&pos| Span::new(pos, pos + name.len()));
        push_unique(
            &mut out,
            line.templated(codes::UNKNOWN_INPUT, ctx!("input" => name), span),
        );
    }

    for output in &asg.outputs {
        if let Some(catalog) = vctx.catalog {
            let value = output.value.map_or("", |v| v.text);
            check_label(line, catalog, output.label_type.text, value, label_region, &mut out);
        }
        if !output.extra.is_empty() {
            push_unique(
                &mut out,
                line.diagnostic(
                    codes::INVALID_LABEL_DEFINITION,
                    "invalid label definition",
                    None,
                ),
            );
        }
    }

    Ok(out)
}

/// Report the first unbalanced `)`, or an unclosed `(` for the whole line.
fn check_parens(line: LineCtx<'_, '_>) -> Option<Diagnostic> {
    let mut depth = 0usize;
    for tok in line.toks {
        match tok.kind {
            TokKind::LParen => depth += 1,
            TokKind::RParen if depth == 0 => {
                return Some(line.diagnostic(
                    codes::MISSING_OPENING_PAREN,
                    "invalid assignment: missing opening parenthesis",
                    Some(tok.span()),
                ));
            }
            TokKind::RParen => depth -= 1,
            _ => {}
        }
    }
    (depth > 0).then(|| {
        line.diagnostic(
            codes::MISSING_CLOSING_PAREN,
            "invalid assignment: missing closing parenthesis",
            None,
        )
    })
}

/// Resolve `label_type.value` against the catalog and report every
/// occurrence of the unresolved part within `region`. An empty value is
/// not checked.
///
/// Occurrences are matched by text and position only, so an unknown value
/// is also reported where the same word follows a different, known type.
fn check_label(
    line: LineCtx<'_, '_>,
    catalog: &LabelCatalog,
    label_type: &str,
    value: &str,
    region: &[Token<'_>],
    out: &mut Vec<Diagnostic>,
) {
    trace!(label_type, value, "resolving label access");
    match catalog.find_type(label_type) {
        None => {
            for pos in locate_in(region, label_type, Boundary::DottedType) {
                push_unique(
                    out,
                    line.templated(
                        codes::UNKNOWN_LABEL_TYPE,
                        ctx!("labelType" => label_type),
                        Some(Span::new(pos, pos + label_type.len())),
                    ),
                );
            }
        }
        Some(ty) if !value.is_empty() && !ty.has_value(value) => {
            for pos in locate_in(region, value, Boundary::DottedValue) {
                push_unique(
                    out,
                    line.templated(
                        codes::UNKNOWN_LABEL_VALUE,
                        ctx!("labelType" => label_type, "labelValue" => value),
                        Some(Span::new(pos, pos + value.len())),
                    ),
                );
            }
        }
        Some(_) => {}
    }
}
