//! Delimiter-aware scanning over Dart source text.
//!
//! There is no token stream: the parser works on byte ranges of the original
//! source and only needs to know where structure is. [`Scanner`] yields the
//! bytes that carry structure and steps over string literals (including raw,
//! triple-quoted, and `${…}` interpolations) and comments.
//!
//! Every delimiter the scanner reports is ASCII, so byte offsets returned
//! here are always char boundaries.

use std::ops::Range;

pub type Span = Range<usize>;

// ── Scanner ───────────────────────────────────────────────────────────────

/// What the scanner is inside of. Strings and `${…}` interpolations nest
/// arbitrarily deep, so they live on an explicit stack.
#[derive(Debug, Clone, Copy)]
enum Nest {
    Str { quote: u8, triple: bool, raw: bool },
    Interp { braces: usize },
}

pub struct Scanner<'s> {
    src: &'s [u8],
    pos: usize,
    end: usize,
    /// Extent of everything seen so far that is neither whitespace nor a
    /// comment. String literals count as code.
    code: Option<Span>,
    nest: Vec<Nest>,
    /// Start of the outermost open string literal.
    string_start: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(src: &'s str, span: Span) -> Self {
        let end = span.end.min(src.len());
        Self {
            src: src.as_bytes(),
            pos: span.start.min(end),
            end,
            code: None,
            nest: Vec::new(),
            string_start: 0,
        }
    }

    fn note_code(&mut self, start: usize, end: usize) {
        match &mut self.code {
            Some(code) => *code = code.start.min(start)..code.end.max(end),
            None => self.code = Some(start..end),
        }
    }

    /// Range from the first to the end of the last code byte consumed so far.
    pub fn code_bounds(&self) -> Option<Span> {
        self.code.clone()
    }

    fn peek_at(&self, i: usize) -> Option<u8> {
        if i < self.end { Some(self.src[i]) } else { None }
    }

    fn starts_with(&self, pat: &[u8]) -> bool {
        self.src[self.pos..self.end].starts_with(pat)
    }

    /// Next byte outside strings and comments, with its offset.
    pub fn next_significant(&mut self) -> Option<(usize, u8)> {
        loop {
            let Some(b) = self.peek_at(self.pos) else {
                // Unterminated strings run to the end of the range; the
                // balance check reports whatever they swallowed.
                if !self.nest.is_empty() {
                    self.nest.clear();
                    self.note_code(self.string_start, self.end);
                }
                self.pos = self.end;
                return None;
            };

            if let Some(&Nest::Str { quote, triple, raw }) = self.nest.last() {
                self.step_string(b, quote, triple, raw);
                continue;
            }

            if self.starts_with(b"//") {
                while !matches!(self.peek_at(self.pos), None | Some(b'\n')) {
                    self.pos += 1;
                }
                continue;
            }
            if self.starts_with(b"/*") {
                self.skip_block_comment();
                continue;
            }
            if b == b'\'' || b == b'"' {
                self.open_string(self.pos, false);
                continue;
            }
            if (b == b'r' || b == b'R')
                && matches!(self.peek_at(self.pos + 1), Some(b'\'' | b'"'))
                && !self.pos.checked_sub(1).is_some_and(|p| is_ident_byte(self.src[p]))
            {
                let at = self.pos;
                self.pos += 1;
                self.open_string(at, true);
                continue;
            }

            self.pos += 1;
            if let Some(Nest::Interp { braces }) = self.nest.last_mut() {
                match b {
                    b'{' => *braces += 1,
                    b'}' => {
                        *braces -= 1;
                        if *braces == 0 {
                            self.nest.pop();
                        }
                    }
                    _ => {}
                }
                continue;
            }
            if !b.is_ascii_whitespace() {
                self.note_code(self.pos - 1, self.pos);
            }
            return Some((self.pos - 1, b));
        }
    }

    /// Dart block comments nest.
    fn skip_block_comment(&mut self) {
        self.pos += 2;
        let mut depth = 1;
        while self.pos < self.end {
            if self.starts_with(b"/*") {
                depth += 1;
                self.pos += 2;
            } else if self.starts_with(b"*/") {
                depth -= 1;
                self.pos += 2;
                if depth == 0 {
                    return;
                }
            } else {
                self.pos += 1;
            }
        }
    }

    /// Positioned on the opening quote; `start` includes any `r` prefix.
    fn open_string(&mut self, start: usize, raw: bool) {
        if self.nest.is_empty() {
            self.string_start = start;
        }
        let quote = self.src[self.pos];
        let triple = self.peek_at(self.pos + 1) == Some(quote) && self.peek_at(self.pos + 2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };
        self.nest.push(Nest::Str { quote, triple, raw });
    }

    /// One step inside the innermost string literal.
    fn step_string(&mut self, b: u8, quote: u8, triple: bool, raw: bool) {
        if !raw && b == b'\\' {
            self.pos += 2;
            return;
        }
        if !raw && b == b'$' && self.peek_at(self.pos + 1) == Some(b'{') {
            self.pos += 2;
            self.nest.push(Nest::Interp { braces: 1 });
            return;
        }
        let closes = b == quote
            && (!triple || (self.peek_at(self.pos + 1) == Some(quote) && self.peek_at(self.pos + 2) == Some(quote)));
        if !closes {
            self.pos += 1;
            return;
        }
        self.pos += if triple { 3 } else { 1 };
        self.nest.pop();
        if self.nest.is_empty() {
            self.note_code(self.string_start, self.pos);
        }
    }
}

// ── Balance ───────────────────────────────────────────────────────────────

/// Why a delimiter scan failed. Offsets are byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unbalanced {
    /// An opener with no closer before the end of the range.
    Unclosed { at: usize, delim: u8 },
    /// A closer with no opener.
    Stray { at: usize, delim: u8 },
    /// A closer that does not match the innermost opener.
    Mismatched { at: usize, expected: u8, found: u8 },
}

impl Unbalanced {
    pub fn offset(&self) -> usize {
        match *self {
            Unbalanced::Unclosed { at, .. }
            | Unbalanced::Stray { at, .. }
            | Unbalanced::Mismatched { at, .. } => at,
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Unbalanced::Unclosed { delim, .. } => format!("unclosed '{}'", delim as char),
            Unbalanced::Stray { delim, .. } => format!("unexpected '{}' with nothing to close", delim as char),
            Unbalanced::Mismatched { expected, found, .. } => {
                format!("expected '{}', found '{}'", expected as char, found as char)
            }
        }
    }
}

fn closer_for(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

fn is_opener(b: u8) -> bool {
    matches!(b, b'(' | b'[' | b'{')
}

fn is_closer(b: u8) -> bool {
    matches!(b, b')' | b']' | b'}')
}

/// Check that every delimiter in `span` is properly paired.
pub fn check_balance(src: &str, span: Span) -> Result<(), Unbalanced> {
    let mut stack: Vec<(usize, u8)> = Vec::new();
    let mut scanner = Scanner::new(src, span);
    while let Some((i, b)) = scanner.next_significant() {
        if is_opener(b) {
            stack.push((i, b));
        } else if is_closer(b) {
            match stack.pop() {
                None => return Err(Unbalanced::Stray { at: i, delim: b }),
                Some((_, open)) if closer_for(open) != b => {
                    return Err(Unbalanced::Mismatched { at: i, expected: closer_for(open), found: b });
                }
                Some(_) => {}
            }
        }
    }
    match stack.pop() {
        Some((at, delim)) => Err(Unbalanced::Unclosed { at, delim }),
        None => Ok(()),
    }
}

/// Offset of the delimiter closing the opener at `open`, searching up to `end`.
pub fn matching_close(src: &str, open: usize, end: usize) -> Result<usize, Unbalanced> {
    let first = src.as_bytes()[open];
    let mut stack = vec![first];
    let mut scanner = Scanner::new(src, open + 1..end);
    while let Some((i, b)) = scanner.next_significant() {
        if is_opener(b) {
            stack.push(b);
        } else if is_closer(b) {
            let Some(top) = stack.pop() else {
                return Err(Unbalanced::Stray { at: i, delim: b });
            };
            if closer_for(top) != b {
                return Err(Unbalanced::Mismatched { at: i, expected: closer_for(top), found: b });
            }
            if stack.is_empty() {
                return Ok(i);
            }
        }
    }
    Err(Unbalanced::Unclosed { at: open, delim: first })
}

/// Offset of the `>` closing the type-argument list that opens at
/// `span.start`: `<String, List<int>>`.
pub fn matching_angle(src: &str, span: Span) -> Option<usize> {
    let mut depth = 0usize;
    let mut scanner = Scanner::new(src, span);
    while let Some((i, b)) = scanner.next_significant() {
        match b {
            b'<' => depth += 1,
            b'>' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'(' | b')' | b'[' | b']' | b'{' | b'}' | b';' | b'=' => return None,
            _ => {}
        }
    }
    None
}

// ── Top-level search ──────────────────────────────────────────────────────

/// First offset of `needle` in `span` that is outside strings, comments, and
/// any `()`, `[]` or `{}` nesting.
pub fn find_top_level(src: &str, span: Span, needle: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut scanner = Scanner::new(src, span);
    while let Some((i, b)) = scanner.next_significant() {
        if depth == 0 && b == needle {
            return Some(i);
        }
        if is_opener(b) {
            depth += 1;
        } else if is_closer(b) {
            depth = depth.saturating_sub(1);
        }
    }
    None
}

/// Split `span` on top-level `sep` bytes. Segments are trimmed and blank
/// segments (such as the one after a trailing comma) are dropped.
pub fn split_top_level(src: &str, span: Span, sep: u8) -> Vec<Span> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = span.start;
    let end = span.end;
    let mut scanner = Scanner::new(src, span);
    while let Some((i, b)) = scanner.next_significant() {
        if is_opener(b) {
            depth += 1;
        } else if is_closer(b) {
            depth = depth.saturating_sub(1);
        } else if b == sep && depth == 0 {
            push_trimmed(src, start..i, &mut parts);
            start = i + 1;
        }
    }
    push_trimmed(src, start..end, &mut parts);
    parts
}

fn push_trimmed(src: &str, span: Span, parts: &mut Vec<Span>) {
    let span = trim_code(src, span);
    if !span.is_empty() {
        parts.push(span);
    }
}

/// Narrow `span` past surrounding whitespace and comments. A span holding
/// nothing but comments becomes empty.
pub fn trim_code(src: &str, span: Span) -> Span {
    let mut scanner = Scanner::new(src, span.clone());
    while scanner.next_significant().is_some() {}
    scanner.code_bounds().unwrap_or(span.start..span.start)
}

// ── Words ─────────────────────────────────────────────────────────────────

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Whether `word` occurs at `at` as a whole word.
pub fn word_at(src: &str, at: usize, word: &str) -> bool {
    let bytes = src.as_bytes();
    src[at..].starts_with(word)
        && !at.checked_sub(1).is_some_and(|p| is_ident_byte(bytes[p]))
        && !bytes.get(at + word.len()).is_some_and(|&b| is_ident_byte(b))
}

/// Offset of the first non-whitespace byte at or after `at`.
pub fn skip_ws(src: &str, at: usize) -> usize {
    let bytes = src.as_bytes();
    let mut i = at;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Identifier starting at `at`, if any.
pub fn ident_at(src: &str, at: usize) -> Option<Span> {
    let bytes = src.as_bytes();
    let first = *bytes.get(at)?;
    if !(first.is_ascii_alphabetic() || first == b'_' || first == b'$') {
        return None;
    }
    let mut end = at + 1;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some(at..end)
}

/// Whether the whole of `text` is one identifier.
pub fn is_identifier(text: &str) -> bool {
    ident_at(text, 0).is_some_and(|span| span.end == text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(src: &str) -> String {
        let mut s = Scanner::new(src, 0..src.len());
        let mut out = String::new();
        while let Some((_, b)) = s.next_significant() {
            if !b.is_ascii_whitespace() {
                out.push(b as char);
            }
        }
        out
    }

    fn texts<'a>(src: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().map(|s| &src[s.clone()]).collect()
    }

    // ── Scanner ───────────────────────────────────────────────────────────

    #[test]
    fn skips_single_and_double_quoted_strings() {
        assert_eq!(significant(r#"a('x(', "y)")"#), "a(,)");
    }

    #[test]
    fn skips_escaped_quote() {
        assert_eq!(significant(r"f('it\'s')"), "f()");
    }

    #[test]
    fn skips_interpolation_with_nested_string() {
        assert_eq!(significant(r#"f('${m['k']}')"#), "f()");
    }

    #[test]
    fn skips_raw_and_triple_quoted_strings() {
        assert_eq!(significant(r"f(r'\', '''a ' ( b''')"), "f(,)");
    }

    #[test]
    fn skips_comments() {
        assert_eq!(significant("a( // ) x\n /* ( /* ) */ */ )"), "a()");
    }

    #[test]
    fn r_inside_identifier_is_not_raw_prefix() {
        // `bar'` is not a raw string; the quote opens an ordinary string.
        assert_eq!(significant("bar'(')"), "bar)");
    }

    #[test]
    fn deeply_nested_interpolation() {
        let depth = 60_000;
        let src = format!("Text({}x{})", "'${".repeat(depth), "}'".repeat(depth));
        assert_eq!(significant(&src), "Text()");
        assert_eq!(check_balance(&src, 0..src.len()), Ok(()));
    }

    #[test]
    fn unterminated_string_inside_interpolation_runs_to_end() {
        let src = "f('${g('x)}";
        assert_eq!(significant(src), "f(");
        assert_eq!(trim_code(src, 0..src.len()), 0..src.len());
    }

    // ── Balance ───────────────────────────────────────────────────────────

    #[test]
    fn balanced_nesting_ok() {
        let src = "A(b: [C(), {d: E()}])";
        assert_eq!(check_balance(src, 0..src.len()), Ok(()));
    }

    #[test]
    fn unclosed_paren_reports_opener() {
        let src = "A(b: C()";
        assert_eq!(check_balance(src, 0..src.len()), Err(Unbalanced::Unclosed { at: 1, delim: b'(' }));
    }

    #[test]
    fn stray_closer() {
        let src = "A())";
        assert_eq!(check_balance(src, 0..src.len()), Err(Unbalanced::Stray { at: 3, delim: b')' }));
    }

    #[test]
    fn mismatched_closer() {
        let src = "A([)]";
        assert_eq!(
            check_balance(src, 0..src.len()),
            Err(Unbalanced::Mismatched { at: 3, expected: b']', found: b')' })
        );
    }

    #[test]
    fn delimiters_in_strings_do_not_count() {
        let src = "Text('(((')";
        assert_eq!(check_balance(src, 0..src.len()), Ok(()));
    }

    #[test]
    fn matching_close_skips_nested() {
        let src = "A(b: C(d), e: [f])";
        assert_eq!(matching_close(src, 1, src.len()), Ok(src.len() - 1));
    }

    // ── Splitting ─────────────────────────────────────────────────────────

    #[test]
    fn split_ignores_nested_commas() {
        let src = "a: B(c, d), e: [f, g], h: 'i, j'";
        let parts = split_top_level(src, 0..src.len(), b',');
        assert_eq!(texts(src, &parts), vec!["a: B(c, d)", "e: [f, g]", "h: 'i, j'"]);
    }

    #[test]
    fn split_drops_trailing_comma() {
        let src = "A(), B(),\n";
        let parts = split_top_level(src, 0..src.len(), b',');
        assert_eq!(texts(src, &parts), vec!["A()", "B()"]);
    }

    #[test]
    fn find_top_level_skips_nested_colon() {
        let src = "A(b: 1)";
        assert_eq!(find_top_level(src, 0..src.len(), b':'), None);
        let src = "key: A(b: 1)";
        assert_eq!(find_top_level(src, 0..src.len(), b':'), Some(3));
    }

    #[test]
    fn split_drops_comments_between_items() {
        let src = "// first\nA(), /* second */ B('x'), // trailing\n";
        let parts = split_top_level(src, 0..src.len(), b',');
        assert_eq!(texts(src, &parts), vec!["A()", "B('x')"]);
    }

    #[test]
    fn trim_code_keeps_trailing_string() {
        let src = "  'a' // note";
        assert_eq!(&src[trim_code(src, 0..src.len())], "'a'");
    }

    #[test]
    fn angle_brackets() {
        let src = "<String, List<int>>[]";
        assert_eq!(matching_angle(src, 0..src.len()), Some(18));
        let src = "a < b";
        assert_eq!(matching_angle(src, 0..src.len()), None);
    }

    // ── Words ─────────────────────────────────────────────────────────────

    #[test]
    fn word_boundaries() {
        assert!(word_at("return x;", 0, "return"));
        assert!(!word_at("returned", 0, "return"));
        assert!(!word_at("xreturn", 1, "return"));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("mainAxisAlignment"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier("'Hi"));
        assert!(!is_identifier(""));
    }
}
