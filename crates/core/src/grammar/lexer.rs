use super::diag::Span;

/// Classification of a behavior lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// A run of `[A-Za-z0-9_]` characters.
    Word,
    /// `|`
    Pipe,
    /// `&`
    Amp,
    /// `!`
    Bang,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semi,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// One or more ASCII whitespace characters.
    Whitespace,
    /// Any other single character, including non-ASCII ones.
    Other,
}

/// A token that borrows its text directly from the line.
///
/// `text` is always exactly `&line[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the line for this token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Byte span of this token.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// `true` for tokens that may appear inside an input identifier.
    pub fn is_ident_part(&self) -> bool {
        matches!(self.kind, TokKind::Word | TokKind::Pipe)
    }
}

/// `true` for the characters of a [`TokKind::Word`].
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize one line of behavior text.
///
/// Lexing never fails: characters outside the behavior alphabet become
/// [`TokKind::Other`] tokens and are rejected by the parsers. Every byte of
/// the line is covered by exactly one token.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut toks = Vec::new();
    let mut chars = line.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let kind = match c {
            '|' => TokKind::Pipe,
            '&' => TokKind::Amp,
            '!' => TokKind::Bang,
            '.' => TokKind::Dot,
            ',' => TokKind::Comma,
            ';' => TokKind::Semi,
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '{' => TokKind::LBrace,
            '}' => TokKind::RBrace,
            c if is_word_char(c) => {
                while chars.next_if(|&(_, c)| is_word_char(c)).is_some() {}
                TokKind::Word
            }
            c if c.is_ascii_whitespace() => {
                while chars.next_if(|&(_, c)| c.is_ascii_whitespace()).is_some() {}
                TokKind::Whitespace
            }
            _ => TokKind::Other,
        };
        let end = chars.peek().map_or(line.len(), |&(i, _)| i);
        toks.push(Token {
            kind,
            text: &line[start..end],
            start,
            end,
        });
    }
    toks
}
