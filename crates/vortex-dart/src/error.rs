use std::fmt;

/// Which stage of the parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `Widget build(BuildContext …)` declaration in the source.
    DeclarationNotFound,
    /// Unbalanced `(`/`)`, `[`/`]` or `{`/`}`.
    MalformedExpression,
    /// The declaration body has no `return <expr>;`.
    ReturnExpressionNotFound,
    /// The returned expression is not a constructor call.
    UnsupportedExpression,
    /// Constructor calls nested deeper than the configured limit.
    NestingTooDeep,
}

impl ParseErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::DeclarationNotFound => "declaration not found",
            ParseErrorKind::MalformedExpression => "malformed expression",
            ParseErrorKind::ReturnExpressionNotFound => "return expression not found",
            ParseErrorKind::UnsupportedExpression => "unsupported expression",
            ParseErrorKind::NestingTooDeep => "nesting too deep",
        }
    }
}

/// A parse error from a Dart source document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { kind, message: msg.into(), line, col }
    }

    /// Build an error positioned at byte `offset` of `src`.
    pub(crate) fn at(kind: ParseErrorKind, msg: impl Into<String>, src: &str, offset: usize) -> Self {
        let (line, col) = line_col(src, offset);
        Self::new(kind, msg, line, col)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dart parse error at {}:{}: {}: {}",
            self.line,
            self.col,
            self.kind.as_str(),
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// 1-based line and column (in chars) of byte `offset`.
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(src.len());
    let before = &src[..floor_char_boundary(src, offset)];
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}

fn floor_char_boundary(src: &str, mut offset: usize) -> usize {
    while offset > 0 && !src.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_first_char() {
        assert_eq!(line_col("abc", 0), (1, 1));
    }

    #[test]
    fn line_col_after_newline() {
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
    }

    #[test]
    fn line_col_clamps_past_end() {
        assert_eq!(line_col("ab", 10), (1, 3));
    }

    #[test]
    fn display_names_stage() {
        let e = ParseError::new(ParseErrorKind::MalformedExpression, "unclosed '('", 3, 7);
        assert_eq!(
            e.to_string(),
            "dart parse error at 3:7: malformed expression: unclosed '('"
        );
    }
}
