use serde::Serialize;
use super::diag::Span;

/// A piece of source text with its byte span inside the line.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Ident<'a> {
    /// Text as written (empty for an empty list item).
    pub text: &'a str,
    /// Byte span of `text`; zero-width for an empty list item.
    pub span: Span,
}

/// Classification of a single line, decided by its prefix alone.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Empty line.
    Blank,
    /// Line starting with `#` or `//`.
    Comment,
    /// Line starting with `Forwarding`.
    Forwarding,
    /// Line starting with `Assignment`.
    Assignment,
    /// Anything else.
    Unknown,
}

/// A structurally valid `Forwarding({...})` statement.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Forwarding<'a> {
    /// Trimmed list items in source order; malformed separators leave empty items.
    pub inputs: Vec<Ident<'a>>,
    /// Spans of the separating commas; `commas[i]` follows `inputs[i]`.
    pub commas: Vec<Span>,
}

/// A structurally valid `Assignment({...}; term; {...})` statement.
///
/// The term is kept as raw source here and checked separately with
/// [`scan_term`](super::parser::scan_term), so that an empty or malformed
/// term is reported after parenthesis balance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Assignment<'a> {
    /// Input names in source order (empty when the braces are empty).
    pub inputs: Vec<Ident<'a>>,
    /// Untrimmed text between the two semicolons.
    pub term: Ident<'a>,
    /// Output label paths in source order.
    pub outputs: Vec<LabelRef<'a>>,
    /// Byte range of the input list braces, `{` to `}` inclusive.
    pub input_span: Span,
    /// Byte range from the term start to the end of the output list.
    pub label_span: Span,
}

/// A label access `Type.Value`, possibly malformed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabelRef<'a> {
    /// Segment before the first dot.
    pub label_type: Ident<'a>,
    /// Segment after the first dot; `None` when nothing follows the dot.
    pub value: Option<Ident<'a>>,
    /// Further dot-separated segments, which make the access invalid.
    pub extra: Vec<Ident<'a>>,
}

impl LabelRef<'_> {
    /// Span from the type to the last segment.
    pub fn span(&self) -> Span {
        let last = self
            .extra
            .last()
            .or(self.value.as_ref())
            .map_or(self.label_type.span, |seg| seg.span);
        self.label_type.span.to(last)
    }
}

/// Binary operators of a term.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BinaryOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// A parsed boolean term.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Expr<'a> {
    /// `TRUE` or `FALSE`.
    Bool {
        /// The literal value.
        value: bool,
        /// Source span of the literal.
        span: Span,
    },
    /// A label access.
    Label(LabelRef<'a>),
    /// `!operand`.
    Not {
        /// Negated expression.
        operand: Box<Expr<'a>>,
        /// Span from `!` to the end of the operand.
        span: Span,
    },
    /// `lhs && rhs` or `lhs || rhs`.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr<'a>>,
        /// Right operand.
        rhs: Box<Expr<'a>>,
    },
    /// `( inner )`.
    Group {
        /// Parenthesized expression.
        inner: Box<Expr<'a>>,
        /// Span including both parentheses.
        span: Span,
    },
}

impl<'a> Expr<'a> {
    /// Source span of the whole expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Bool { span, .. } | Expr::Not { span, .. } | Expr::Group { span, .. } => *span,
            Expr::Label(label) => label.span(),
            Expr::Binary { lhs, rhs, .. } => lhs.span().to(rhs.span()),
        }
    }

    /// All label accesses, left to right.
    pub fn labels(&self) -> Vec<&LabelRef<'a>> {
        let mut out = Vec::new();
        self.collect_labels(&mut out);
        out
    }

    fn collect_labels<'e>(&'e self, out: &mut Vec<&'e LabelRef<'a>>) {
        match self {
            Expr::Bool { .. } => {}
            Expr::Label(label) => out.push(label),
            Expr::Not { operand, .. } => operand.collect_labels(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_labels(out);
                rhs.collect_labels(out);
            }
            Expr::Group { inner, .. } => inner.collect_labels(out),
        }
    }
}
