use super::{
    ast::{Assignment, BinaryOp, Expr, Forwarding, Ident, LabelRef, LineKind},
    diag::Span,
    lexer::{TokKind, Token},
};
use thiserror::Error;

/// Keyword opening a forwarding statement.
pub const FORWARDING_KEYWORD: &str = "Forwarding";
/// Keyword opening an assignment statement.
pub const ASSIGNMENT_KEYWORD: &str = "Assignment";

/// Why a term failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} at byte {at}")]
pub struct TermError {
    /// What the parser was looking for.
    pub expected: &'static str,
    /// Byte offset in the line where parsing stopped.
    pub at: usize,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Classify a line by its prefix. Nothing is trimmed.
pub fn classify_line(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with('#') || line.starts_with("//") {
        LineKind::Comment
    } else if line.starts_with(FORWARDING_KEYWORD) {
        LineKind::Forwarding
    } else if line.starts_with(ASSIGNMENT_KEYWORD) {
        LineKind::Assignment
    } else {
        LineKind::Unknown
    }
}

/// Match a whole line against `Forwarding({ Item (, Item)* })`.
///
/// Items may be empty (so that separator problems can be reported precisely);
/// a non-empty item must be an identifier of at least `min_name_len`
/// characters. Returns `None` on any structural mismatch.
pub fn parse_forwarding<'a>(
    line: &'a str,
    toks: &[Token<'a>],
    min_name_len: usize,
) -> Option<Forwarding<'a>> {
    let mut c = Cursor::new(line, toks);
    c.keyword(FORWARDING_KEYWORD)?;
    c.eat(TokKind::LParen)?;
    c.eat(TokKind::LBrace)?;
    let (inputs, commas) = c.input_items(min_name_len)?;
    c.eat(TokKind::RBrace)?;
    c.eat(TokKind::RParen)?;
    c.at_end().then_some(Forwarding { inputs, commas })
}

/// Match a whole line against `Assignment({ InputList? } ; Term ; { OutputList? })`.
///
/// Parentheses outside the term are grouping trivia here; their balance is
/// checked separately. The term is only checked for its alphabet. Returns
/// `None` on any structural mismatch.
pub fn parse_assignment<'a>(
    line: &'a str,
    toks: &[Token<'a>],
    min_name_len: usize,
) -> Option<Assignment<'a>> {
    let mut c = Cursor::new(line, toks);
    c.keyword(ASSIGNMENT_KEYWORD)?;
    c.eat(TokKind::LParen)?;
    c.skip_parens();

    let open = c.eat(TokKind::LBrace)?;
    let (items, _) = c.input_items(min_name_len)?;
    let inputs = match items.as_slice() {
        [only] if only.text.is_empty() => Vec::new(),
        _ if items.iter().any(|i| i.text.is_empty()) => return None,
        _ => items,
    };
    let close = c.eat(TokKind::RBrace)?;
    c.skip_parens();
    c.eat(TokKind::Semi)?;

    let term_start = c.offset();
    while c.peek().is_some_and(|t| is_term_token(t.kind)) {
        c.bump();
    }
    let term_end = c.offset();
    c.eat(TokKind::Semi)?;

    c.skip_parens();
    c.eat(TokKind::LBrace)?;
    let outputs = c.label_paths()?;
    let out_close = c.eat(TokKind::RBrace)?;
    c.skip_parens();
    if !c.at_end() {
        return None;
    }

    Some(Assignment {
        inputs,
        term: Ident {
            text: &line[term_start..term_end],
            span: Span::new(term_start, term_end),
        },
        outputs,
        input_span: open.span().to(close.span()),
        label_span: Span::new(term_start, out_close.end),
    })
}

/// Parse a boolean term from its tokens.
///
/// ```text
/// or    := and ( '||' and )*
/// and   := unary ( '&&' unary )*
/// unary := '!' unary | atom
/// atom  := 'TRUE' | 'FALSE' | Type '.' Value | '(' or ')'
/// ```
///
/// Whitespace may separate any two tokens except inside `||`, `&&` and a
/// label access. A label access with a third dot-separated segment is rejected.
pub fn parse_term<'a>(toks: &[Token<'a>]) -> Result<Expr<'a>, TermError> {
    let end_offset = toks.last().map_or(0, |t| t.end);
    let mut p = TermParser {
        toks,
        pos: 0,
        end_offset,
    };
    let expr = p.or()?;
    p.skip_ws();
    if p.pos < toks.len() {
        return Err(p.error("operator or end of term"));
    }
    Ok(expr)
}

/// Check a term against the term alphabet and collect its label accesses,
/// left to right.
///
/// A term is any sequence of whitespace, `!`, `TRUE`, `FALSE`, `||`, `&&`,
/// `(`, `)` and label accesses `Type.Value`; operators and parentheses need
/// not nest. Rejected are words that are neither literals nor label
/// accesses, a lone `|` or `&`, a `.` without a word on both sides, and a
/// third dot-separated segment. [`parse_term`] builds the tree for terms
/// that also nest.
pub fn scan_term<'a>(toks: &[Token<'a>]) -> Result<Vec<LabelRef<'a>>, TermError> {
    let end_offset = toks.last().map_or(0, |t| t.end);
    let kind_at = |i: usize| toks.get(i).map(|t| t.kind);
    let fail = |expected: &'static str, i: usize| TermError {
        expected,
        at: toks.get(i).map_or(end_offset, |t| t.start),
    };

    let mut labels = Vec::new();
    let mut i = 0;
    while let Some(&tok) = toks.get(i) {
        match tok.kind {
            TokKind::Whitespace | TokKind::Bang | TokKind::LParen | TokKind::RParen => i += 1,
            TokKind::Pipe if kind_at(i + 1) == Some(TokKind::Pipe) => i += 2,
            TokKind::Amp if kind_at(i + 1) == Some(TokKind::Amp) => i += 2,
            TokKind::Pipe => return Err(fail("'||'", i)),
            TokKind::Amp => return Err(fail("'&&'", i)),
            TokKind::Word if kind_at(i + 1) == Some(TokKind::Dot) => {
                if kind_at(i + 2) != Some(TokKind::Word) {
                    return Err(fail("label value", i + 2));
                }
                if kind_at(i + 3) == Some(TokKind::Dot) {
                    return Err(fail("end of label access", i + 3));
                }
                labels.push(LabelRef {
                    label_type: word_ident(tok),
                    value: Some(word_ident(toks[i + 2])),
                    extra: Vec::new(),
                });
                i += 3;
            }
            TokKind::Word if tok.text == "TRUE" || tok.text == "FALSE" => i += 1,
            TokKind::Word => return Err(fail("TRUE, FALSE or a label access", i)),
            _ => return Err(fail("term token", i)),
        }
    }
    Ok(labels)
}

fn is_term_token(kind: TokKind) -> bool {
    matches!(
        kind,
        TokKind::Whitespace
            | TokKind::Bang
            | TokKind::Word
            | TokKind::Dot
            | TokKind::Pipe
            | TokKind::Amp
            | TokKind::LParen
            | TokKind::RParen
    )
}

// ─── Statement cursor ───────────────────────────────────────────────────────

struct Cursor<'t, 'a> {
    line: &'a str,
    toks: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    fn new(line: &'a str, toks: &'t [Token<'a>]) -> Self {
        Self { line, toks, pos: 0 }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.toks.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let tok = *self.toks.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    /// Byte offset of the next token, or the line length at the end.
    fn offset(&self) -> usize {
        self.peek().map_or(self.line.len(), |t| t.start)
    }

    fn eat(&mut self, kind: TokKind) -> Option<Token<'a>> {
        if self.peek()?.kind == kind {
            self.bump()
        } else {
            None
        }
    }

    fn keyword(&mut self, word: &str) -> Option<Token<'a>> {
        let tok = self.peek()?;
        if tok.kind == TokKind::Word && tok.text == word {
            self.bump()
        } else {
            None
        }
    }

    fn skip(&mut self, kind: TokKind) {
        while self.eat(kind).is_some() {}
    }

    fn skip_parens(&mut self) {
        while self
            .peek()
            .is_some_and(|t| matches!(t.kind, TokKind::LParen | TokKind::RParen))
        {
            self.bump();
        }
    }

    /// `[A-Za-z0-9_][A-Za-z0-9_|]*`, i.e. a word followed by adjacent words and pipes.
    ///
    /// `Some(None)` when no identifier starts here; `None` when one does but
    /// is shorter than `min_len` characters.
    fn identifier(&mut self, min_len: usize) -> Option<Option<Ident<'a>>> {
        if self.peek().is_none_or(|t| t.kind != TokKind::Word) {
            return Some(None);
        }
        let start = self.offset();
        while self.peek().is_some_and(Token::is_ident_part) {
            self.bump();
        }
        let end = self.offset();
        let text = &self.line[start..end];
        if text.chars().count() < min_len {
            return None;
        }
        Some(Some(Ident {
            text,
            span: Span::new(start, end),
        }))
    }

    /// Comma-separated identifiers with optional surrounding whitespace.
    /// Missing identifiers become empty items.
    fn input_items(&mut self, min_len: usize) -> Option<(Vec<Ident<'a>>, Vec<Span>)> {
        let mut items = Vec::new();
        let mut commas = Vec::new();
        loop {
            self.skip(TokKind::Whitespace);
            let item = self.identifier(min_len)?.unwrap_or_else(|| Ident {
                text: "",
                span: Span::empty(self.offset()),
            });
            items.push(item);
            self.skip(TokKind::Whitespace);
            match self.eat(TokKind::Comma) {
                Some(comma) => commas.push(comma.span()),
                None => return Some((items, commas)),
            }
        }
    }

    /// Comma-separated `Type.Value` paths; an all-whitespace list is empty.
    fn label_paths(&mut self) -> Option<Vec<LabelRef<'a>>> {
        self.skip(TokKind::Whitespace);
        if self.peek().is_some_and(|t| t.kind == TokKind::RBrace) {
            return Some(Vec::new());
        }
        let mut paths = Vec::new();
        loop {
            self.skip(TokKind::Whitespace);
            paths.push(self.label_path()?);
            self.skip(TokKind::Whitespace);
            if self.eat(TokKind::Comma).is_none() {
                return Some(paths);
            }
        }
    }

    fn label_path(&mut self) -> Option<LabelRef<'a>> {
        let label_type = self.eat(TokKind::Word)?;
        self.eat(TokKind::Dot)?;
        let value = self.eat(TokKind::Word).map(word_ident);
        let mut extra = Vec::new();
        while self.eat(TokKind::Dot).is_some() {
            extra.push(match self.eat(TokKind::Word) {
                Some(word) => word_ident(word),
                None => Ident {
                    text: "",
                    span: Span::empty(self.offset()),
                },
            });
        }
        Some(LabelRef {
            label_type: word_ident(label_type),
            value,
            extra,
        })
    }
}

fn word_ident(tok: Token<'_>) -> Ident<'_> {
    Ident {
        text: tok.text,
        span: tok.span(),
    }
}

// ─── Term parser ────────────────────────────────────────────────────────────

struct TermParser<'t, 'a> {
    toks: &'t [Token<'a>],
    pos: usize,
    end_offset: usize,
}

impl<'t, 'a> TermParser<'t, 'a> {
    fn kind_at(&self, pos: usize) -> Option<TokKind> {
        self.toks.get(pos).map(|t| t.kind)
    }

    fn skip_ws(&mut self) {
        while self.kind_at(self.pos) == Some(TokKind::Whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, expected: &'static str) -> TermError {
        TermError {
            expected,
            at: self.toks.get(self.pos).map_or(self.end_offset, |t| t.start),
        }
    }

    /// Consume two adjacent `kind` tokens (`||` or `&&`).
    fn eat_doubled(&mut self, kind: TokKind) -> bool {
        self.skip_ws();
        if self.kind_at(self.pos) == Some(kind) && self.kind_at(self.pos + 1) == Some(kind) {
            self.pos += 2;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr<'a>, TermError> {
        let mut lhs = self.and()?;
        while self.eat_doubled(TokKind::Pipe) {
            let rhs = self.and()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr<'a>, TermError> {
        let mut lhs = self.unary()?;
        while self.eat_doubled(TokKind::Amp) {
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr<'a>, TermError> {
        self.skip_ws();
        if self.kind_at(self.pos) == Some(TokKind::Bang) {
            let bang = self.toks[self.pos].span();
            self.pos += 1;
            let operand = self.unary()?;
            let span = bang.to(operand.span());
            return Ok(Expr::Not {
                operand: Box::new(operand),
                span,
            });
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr<'a>, TermError> {
        self.skip_ws();
        let Some(&tok) = self.toks.get(self.pos) else {
            return Err(self.error("operand"));
        };
        match tok.kind {
            TokKind::LParen => {
                self.pos += 1;
                let inner = self.or()?;
                self.skip_ws();
                if self.kind_at(self.pos) != Some(TokKind::RParen) {
                    return Err(self.error("')'"));
                }
                let close = self.toks[self.pos].span();
                self.pos += 1;
                Ok(Expr::Group {
                    inner: Box::new(inner),
                    span: tok.span().to(close),
                })
            }
            TokKind::Word if self.kind_at(self.pos + 1) == Some(TokKind::Dot) => {
                self.label_access()
            }
            TokKind::Word if tok.text == "TRUE" || tok.text == "FALSE" => {
                self.pos += 1;
                Ok(Expr::Bool {
                    value: tok.text == "TRUE",
                    span: tok.span(),
                })
            }
            TokKind::Word => Err(self.error("TRUE, FALSE or a label access")),
            _ => Err(self.error("operand")),
        }
    }

    fn label_access(&mut self) -> Result<Expr<'a>, TermError> {
        let label_type = word_ident(self.toks[self.pos]);
        // Word and Dot checked by the caller.
        self.pos += 2;
        if self.kind_at(self.pos) != Some(TokKind::Word) {
            return Err(self.error("label value"));
        }
        let value = word_ident(self.toks[self.pos]);
        self.pos += 1;
        if self.kind_at(self.pos) == Some(TokKind::Dot) {
            return Err(self.error("end of label access"));
        }
        Ok(Expr::Label(LabelRef {
            label_type,
            value: Some(value),
            extra: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::lexer::tokenize;

    fn forwarding(line: &str) -> Option<Vec<&str>> {
        let toks = tokenize(line);
        parse_forwarding(line, &toks, 1).map(|f| f.inputs.iter().map(|i| i.text).collect())
    }

    fn term(src: &str) -> Result<Expr<'_>, TermError> {
        let toks = tokenize(src);
        parse_term(&toks)
    }

    fn scan(src: &str) -> Result<Vec<LabelRef<'_>>, TermError> {
        let toks = tokenize(src);
        scan_term(&toks)
    }

    // ── Classifier ──────────────────────────────────────────────────────

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify_line(""), LineKind::Blank);
        assert_eq!(classify_line("# note"), LineKind::Comment);
        assert_eq!(classify_line("// note"), LineKind::Comment);
        assert_eq!(classify_line("Forwarding({a})"), LineKind::Forwarding);
        assert_eq!(classify_line("ForwardingStuff"), LineKind::Forwarding);
        assert_eq!(classify_line("Assignment"), LineKind::Assignment);
        assert_eq!(classify_line(" Forwarding({a})"), LineKind::Unknown);
        assert_eq!(classify_line(" "), LineKind::Unknown);
        assert_eq!(classify_line("/ x"), LineKind::Unknown);
    }

    // ── Forwarding ──────────────────────────────────────────────────────

    #[test]
    fn forwarding_items_are_trimmed() {
        assert_eq!(forwarding("Forwarding({a, b ,c})"), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn forwarding_keeps_empty_items() {
        assert_eq!(forwarding("Forwarding({a,})"), Some(vec!["a", ""]));
        assert_eq!(forwarding("Forwarding({,a})"), Some(vec!["", "a"]));
        assert_eq!(forwarding("Forwarding({})"), Some(vec![""]));
    }

    #[test]
    fn forwarding_identifiers_may_contain_pipes() {
        assert_eq!(forwarding("Forwarding({in|1, x})"), Some(vec!["in|1", "x"]));
    }

    #[test]
    fn forwarding_structural_mismatches() {
        for line in [
            "Forwarding",
            "Forwarding({a}",
            "Forwarding({a}) ",
            "Forwarding ({a})",
            "Forwarding({a b})",
            "Forwarding({|a})",
            "Forwarding({a.b})",
            "Forwardings({a})",
            "Forwarding({a});",
        ] {
            assert_eq!(forwarding(line), None, "{line:?} should not match");
        }
    }

    #[test]
    fn forwarding_minimum_identifier_length() {
        let line = "Forwarding({a, bc})";
        let toks = tokenize(line);
        assert!(parse_forwarding(line, &toks, 1).is_some());
        assert!(parse_forwarding(line, &toks, 2).is_none());
    }

    #[test]
    fn forwarding_comma_spans() {
        let line = "Forwarding({a,,b})";
        let toks = tokenize(line);
        let f = parse_forwarding(line, &toks, 1).unwrap();
        assert_eq!(f.commas, vec![Span::new(13, 14), Span::new(14, 15)]);
        assert_eq!(f.inputs[1].span, Span::empty(14));
    }

    // ── Assignment ──────────────────────────────────────────────────────

    #[test]
    fn assignment_parts() {
        let line = "Assignment({in, other};!A.b || TRUE;{Out.v, X.y})";
        let toks = tokenize(line);
        let a = parse_assignment(line, &toks, 1).unwrap();
        let inputs: Vec<_> = a.inputs.iter().map(|i| i.text).collect();
        assert_eq!(inputs, vec!["in", "other"]);
        assert_eq!(a.term.text, "!A.b || TRUE");
        assert_eq!(a.outputs.len(), 2);
        assert_eq!(a.outputs[1].label_type.text, "X");
        assert_eq!(a.outputs[1].value.unwrap().text, "y");
        assert_eq!(a.input_span, Span::new(11, 22));
        assert_eq!(&line[a.label_span.start..a.label_span.end], "!A.b || TRUE;{Out.v, X.y}");
    }

    #[test]
    fn assignment_empty_lists() {
        let line = "Assignment({};TRUE;{})";
        let toks = tokenize(line);
        let a = parse_assignment(line, &toks, 1).unwrap();
        assert!(a.inputs.is_empty());
        assert!(a.outputs.is_empty());
    }

    #[test]
    fn assignment_allows_empty_term_for_later_reporting() {
        let line = "Assignment({a};  ;{})";
        let toks = tokenize(line);
        let a = parse_assignment(line, &toks, 1).unwrap();
        assert_eq!(a.term.text, "  ");
    }

    #[test]
    fn assignment_stray_parens_are_trivia() {
        for line in [
            "Assignment({in}(;TRUE;{Out.v})",
            "Assignment({in};TRUE;{Out.v}))",
            "Assignment({in};TRUE;{Out.v}",
        ] {
            let toks = tokenize(line);
            assert!(parse_assignment(line, &toks, 1).is_some(), "{line:?}");
        }
    }

    #[test]
    fn assignment_output_segments() {
        let line = "Assignment({};TRUE;{A., B.c.d})";
        let toks = tokenize(line);
        let a = parse_assignment(line, &toks, 1).unwrap();
        assert_eq!(a.outputs[0].value, None);
        assert_eq!(a.outputs[1].extra.len(), 1);
        assert_eq!(a.outputs[1].extra[0].text, "d");
    }

    #[test]
    fn assignment_structural_mismatches() {
        for line in [
            "Assignment",
            "Assignment({a};TRUE)",
            "Assignment({a};TRUE;{B.c};)",
            "Assignment({a,};TRUE;{})",
            "Assignment({a};TRUE;{B})",
            "Assignment({a};A.b, C.d;{})",
            "Assignment({a};TRUE;{}) x",
            "Assignment({a}; TRUE ;{B.c}) ;",
            "Assignment ({a};TRUE;{})",
        ] {
            let toks = tokenize(line);
            assert!(parse_assignment(line, &toks, 1).is_none(), "{line:?} should not match");
        }
    }

    // ── Term ────────────────────────────────────────────────────────────

    #[test]
    fn term_literals_and_labels() {
        assert!(matches!(term("TRUE"), Ok(Expr::Bool { value: true, .. })));
        assert!(matches!(term("FALSE"), Ok(Expr::Bool { value: false, .. })));
        let e = term("Sens.Public").unwrap();
        let labels = e.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label_type.text, "Sens");
        assert_eq!(labels[0].value.unwrap().span, Span::new(5, 11));
    }

    #[test]
    fn term_precedence_and_binds_tighter_than_or() {
        let e = term("A.a || B.b && C.c").unwrap();
        match e {
            Expr::Binary { op: BinaryOp::Or, rhs, .. } => {
                assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::And, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn term_groups_and_negation() {
        let e = term("!(A.a||TRUE) && !!B.b").unwrap();
        let names: Vec<_> = e.labels().iter().map(|l| l.label_type.text).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(e.span(), Span::new(0, 21));
    }

    #[test]
    fn term_rejections() {
        for src in [
            "A.",
            ".b",
            "A.b.c",
            "A . b",
            "A.b |",
            "A.b & C.d",
            "A.b | | C.d",
            "foo",
        ] {
            assert!(term(src).is_err(), "{src:?} should be rejected");
            assert!(scan(src).is_err(), "{src:?} should be rejected by the scan");
        }
    }

    #[test]
    fn tree_parse_requires_nesting() {
        for src in ["TRUE FALSE", "(TRUE", "TRUE)", "()", "!", "A.b!", "|| TRUE"] {
            assert!(term(src).is_err(), "{src:?} has no tree");
            assert!(scan(src).is_ok(), "{src:?} is still a valid term");
        }
    }

    #[test]
    fn scan_collects_labels_in_order() {
        let labels = scan("!A.a TRUE (B.b && A.a").unwrap();
        let names: Vec<_> = labels
            .iter()
            .map(|l| (l.label_type.text, l.value.map(|v| v.text)))
            .collect();
        assert_eq!(
            names,
            vec![("A", Some("a")), ("B", Some("b")), ("A", Some("a"))]
        );
        assert_eq!(labels[1].label_type.span, Span::new(11, 12));
    }

    #[test]
    fn scan_error_positions() {
        let err = scan("TRUE & FALSE").unwrap_err();
        assert_eq!((err.expected, err.at), ("'&&'", 5));
        let err = scan("A.b.c").unwrap_err();
        assert_eq!((err.expected, err.at), ("end of label access", 3));
        let err = scan("TRUE A.").unwrap_err();
        assert_eq!((err.expected, err.at), ("label value", 7));
    }

    #[test]
    fn term_error_position() {
        let err = term("TRUE && ").unwrap_err();
        assert_eq!(err.at, 8);
        assert_eq!(err.expected, "operand");
    }
}
