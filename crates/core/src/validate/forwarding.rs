use super::context::{LineCtx, PortError, ValidationContext};
use super::diagnostics_util::ctx;
use crate::grammar::{
    ast::Ident,
    diag::{Diagnostic, Span, codes},
    locate::{Boundary, locate_in, tokens_in},
    parser::parse_forwarding,
};
use tracing::debug;

/// Validate a line starting with `Forwarding`.
///
/// Structural problems stop at the first finding. Duplicate inputs win over
/// unknown inputs: when any input is repeated, availability is not checked.
pub(super) fn validate_forwarding(
    line: LineCtx<'_, '_>,
    vctx: &mut ValidationContext<'_>,
) -> Result<Vec<Diagnostic>, PortError> {
    let Some(fwd) = parse_forwarding(line.text, line.toks, vctx.config.min_input_name_len) else {
        debug!(line = line.line_no, "forwarding does not match template");
        return Ok(vec![line.diagnostic(
            codes::INVALID_FORWARDING,
            "invalid forwarding(Template:Forwarding({in_ports})",
            None,
        )]);
    };

    if fwd.inputs.iter().all(|i| i.text.is_empty()) {
        return Ok(vec![line.diagnostic(
            codes::FORWARD_WITHOUT_INPUTS,
            "forward needs at least one input",
            None,
        )]);
    }

    if let Some(k) = fwd.inputs.iter().position(|i| i.text.is_empty()) {
        // A leading empty item is blamed on the comma after it, any other on
        // the comma before it.
        let comma = fwd.commas.get(k.saturating_sub(1)).copied();
        return Ok(vec![line.diagnostic(
            codes::TRAILING_COMMA,
            "trailing comma without being followed by an input",
            comma,
        )]);
    }

    let list_span = fwd
        .inputs
        .iter()
        .map(|i| i.span)
        .reduce(Span::to)
        .unwrap_or(Span::empty(0));
    let list = tokens_in(line.toks, list_span);

    let names = distinct(&fwd.inputs);
    let mut out = Vec::new();
    for name in names.iter().filter(|n| fwd.inputs.iter().filter(|i| i.text == **n).count() > 1) {
        for pos in locate_in(list, name, Boundary::Plain) {
            out.push(line.templated(
                codes::DUPLICATE_INPUT,
                ctx!("input" => name),
                Some(Span::new(pos, pos + name.len())),
            ));
        }
    }
    if !out.is_empty() {
        debug!(line = line.line_no, count = out.len(), "duplicate forwarding inputs");
        return Ok(out);
    }

    let available = vctx.available_inputs()?;
    for name in names {
        if available.iter().any(|a| a == name) {
            continue;
        }
        let span = locate_in(list, name, Boundary::Plain)
            .first()
            .map(|&pos| Span::new(pos, pos + name.len()));
        out.push(line.templated(codes::UNKNOWN_INPUT, ctx!("input" => name), span));
    }
    Ok(out)
}

/// Non-empty item texts without repeats, in first-appearance order.
pub(super) fn distinct<'a>(items: &[Ident<'a>]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for item in items {
        if !item.text.is_empty() && !names.contains(&item.text) {
            names.push(item.text);
        }
    }
    names
}
