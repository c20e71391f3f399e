use super::{
    diag::Span,
    lexer::{TokKind, Token, tokenize},
};

/// Boundary rule applied when searching a line for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// A whole identifier: not preceded or followed by an identifier
    /// character (`[A-Za-z0-9_|]`).
    Plain,
    /// A label type: a whole word immediately followed by `.`.
    DottedType,
    /// A label value: a whole word immediately preceded by `.`.
    DottedValue,
}

/// Byte offsets of every occurrence of `token` in `line` under `boundary`,
/// in ascending order.
///
/// ```
/// use dfd_behavior_core::grammar::locate::{Boundary, locate_token};
///
/// assert_eq!(locate_token("Forwarding({in, in|x})", "in", Boundary::Plain), vec![12]);
/// assert_eq!(locate_token("A.b && B.A", "A", Boundary::DottedValue), vec![9]);
/// ```
pub fn locate_token(line: &str, token: &str, boundary: Boundary) -> Vec<usize> {
    locate_in(&tokenize(line), token, boundary)
}

/// [`locate_token`] over an already tokenized line or a contiguous slice of it.
pub fn locate_in(toks: &[Token<'_>], token: &str, boundary: Boundary) -> Vec<usize> {
    if token.is_empty() {
        return Vec::new();
    }
    match boundary {
        Boundary::Plain => ident_runs(toks)
            .filter(|run| run_text_eq(run, token))
            .map(|run| run[0].start)
            .collect(),
        Boundary::DottedType => words_eq(toks, token)
            .filter(|&i| toks.get(i + 1).is_some_and(|t| t.kind == TokKind::Dot))
            .map(|i| toks[i].start)
            .collect(),
        Boundary::DottedValue => words_eq(toks, token)
            .filter(|&i| i > 0 && toks[i - 1].kind == TokKind::Dot)
            .map(|i| toks[i].start)
            .collect(),
    }
}

/// The tokens lying entirely inside `span`.
pub fn tokens_in<'t, 'a>(toks: &'t [Token<'a>], span: Span) -> &'t [Token<'a>] {
    let from = toks.partition_point(|t| t.start < span.start);
    let to = toks.partition_point(|t| t.end <= span.end).max(from);
    &toks[from..to]
}

fn words_eq<'t>(toks: &'t [Token<'_>], word: &'t str) -> impl Iterator<Item = usize> + 't {
    toks.iter()
        .enumerate()
        .filter(move |(_, t)| t.kind == TokKind::Word && t.text == word)
        .map(|(i, _)| i)
}

/// Maximal runs of adjacent identifier tokens.
fn ident_runs<'t, 'a>(toks: &'t [Token<'a>]) -> impl Iterator<Item = &'t [Token<'a>]> {
    toks.chunk_by(|a, b| a.is_ident_part() == b.is_ident_part())
        .filter(|run| run[0].is_ident_part())
}

fn run_text_eq(run: &[Token<'_>], text: &str) -> bool {
    let mut rest = text;
    for tok in run {
        match rest.strip_prefix(tok.text) {
            Some(r) => rest = r,
            None => return false,
        }
    }
    rest.is_empty()
}
