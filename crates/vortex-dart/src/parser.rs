use indexmap::IndexMap;

use crate::ast::{PropertyValue, WidgetNode, WidgetTree};
use crate::error::{ParseError, ParseErrorKind};
use crate::locate::{locate_declaration, locate_return_expression};
use crate::scan::{self, Scanner, Span, Unbalanced};

/// Stored in place of any string interpolation. It is itself a quoted
/// literal so it stays valid when emitted verbatim.
pub const INTERPOLATION_PLACEHOLDER: &str = "'INTERPOLATED_STRING'";

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest constructor-call nesting accepted before failing with
    /// [`ParseErrorKind::NestingTooDeep`]. The root is depth 0.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

/// Parses the `build` method of one Dart document into a [`WidgetTree`].
///
/// All spans handed around are byte ranges into the original source, so
/// every error can point at a line and column.
pub struct Parser<'s> {
    src: &'s str,
    options: ParseOptions,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str) -> Self {
        Self::with_options(src, ParseOptions::default())
    }

    pub fn with_options(src: &'s str, options: ParseOptions) -> Self {
        Self { src, options }
    }

    fn malformed(&self, u: Unbalanced) -> ParseError {
        ParseError::at(ParseErrorKind::MalformedExpression, u.describe(), self.src, u.offset())
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<(), ParseError> {
        if depth <= self.options.max_depth {
            return Ok(());
        }
        Err(self.err_at(
            ParseErrorKind::NestingTooDeep,
            format!("nested more than {} levels deep", self.options.max_depth),
            offset,
        ))
    }

    fn err_at(&self, kind: ParseErrorKind, msg: impl Into<String>, offset: usize) -> ParseError {
        ParseError::at(kind, msg, self.src, offset)
    }

    // ── Tree ──────────────────────────────────────────────────────────────

    /// Balance check, declaration, return expression, root widget: the first
    /// step that fails aborts the parse.
    pub fn parse_tree(&self) -> Result<WidgetTree, ParseError> {
        scan::check_balance(self.src, 0..self.src.len()).map_err(|u| self.malformed(u))?;

        let decl = locate_declaration(self.src)?;
        let expr = locate_return_expression(self.src, &decl)?;

        match self.parse_expression(expr.clone(), 0)? {
            Some(root) => Ok(WidgetTree::new(root)),
            None => Err(self.err_at(
                ParseErrorKind::UnsupportedExpression,
                format!("`{}` is not a widget constructor call", snippet(&self.src[expr.clone()])),
                expr.start,
            )),
        }
    }

    // ── Expression ────────────────────────────────────────────────────────

    /// Parse `span` as a constructor call such as `const Text('Hi', style: …)`.
    ///
    /// `Ok(None)` means the text is some other kind of expression; errors are
    /// reserved for unbalanced delimiters and excessive nesting.
    pub fn parse_expression(&self, span: Span, depth: usize) -> Result<Option<WidgetNode>, ParseError> {
        let span = self.strip_keywords(span);
        let text = &self.src[span.clone()];
        let Some(rel) = text.find('(') else {
            return Ok(None);
        };
        let paren = span.start + rel;
        let Some(name) = constructor_name(&self.src[span.start..paren]) else {
            return Ok(None);
        };
        // Only calls count as a level; scalar arguments of the deepest
        // widget are fine.
        self.check_depth(depth, span.start)?;

        let close = scan::matching_close(self.src, paren, span.end).map_err(|u| self.malformed(u))?;
        // `Theme.of(context).textTheme` is a call followed by member access.
        if !self.src[close + 1..span.end].trim().is_empty() {
            return Ok(None);
        }

        let mut node = WidgetNode::new(name.replace('.', "_"));
        for arg in scan::split_top_level(self.src, paren + 1..close, b',') {
            self.parse_argument(&mut node, arg, depth)?;
        }
        Ok(Some(node))
    }

    /// One `name: value` or positional argument of `node`.
    fn parse_argument(&self, node: &mut WidgetNode, arg: Span, depth: usize) -> Result<(), ParseError> {
        let named = scan::find_top_level(self.src, arg.clone(), b':').and_then(|colon| {
            let key = self.src[arg.start..colon].trim();
            scan::is_identifier(key).then_some((key, colon))
        });

        let Some((key, colon)) = named else {
            if let Some(value) = self.classify_value(arg.clone(), depth)? {
                node.arguments.push(value);
            } else {
                log::trace!("{}: skipped positional `{}`", node.name, snippet(&self.src[arg]));
            }
            return Ok(());
        };

        let value = scan::trim_code(self.src, colon + 1..arg.end);
        if key == "children" && self.list_literal(value.clone()).is_some() {
            node.children = self.parse_widget_list(value, depth)?;
            return Ok(());
        }
        match self.classify_value(value.clone(), depth)? {
            Some(v) => {
                node.properties.insert(key.to_string(), v);
            }
            None => log::trace!("{}: skipped `{}: {}`", node.name, key, snippet(&self.src[value])),
        }
        Ok(())
    }

    /// `[A(), B()]` → the widgets, in order. Items that are not constructor
    /// calls (collection `if`, spreads, variables) are dropped.
    fn parse_widget_list(&self, span: Span, depth: usize) -> Result<Vec<WidgetNode>, ParseError> {
        let Some(inner) = self.list_literal(span) else {
            return Ok(Vec::new());
        };
        let mut widgets = Vec::new();
        for item in scan::split_top_level(self.src, inner, b',') {
            match self.parse_expression(item.clone(), depth + 1)? {
                Some(node) => widgets.push(node),
                None => log::debug!("dropped non-widget child `{}`", snippet(&self.src[item])),
            }
        }
        Ok(widgets)
    }

    // ── Values ────────────────────────────────────────────────────────────

    /// Classify an argument value. The order of the checks matters: a nested
    /// call wins over a list, a list over an interpolated string, and so on.
    /// `None` means the value is a closure and is skipped.
    fn classify_value(&self, span: Span, depth: usize) -> Result<Option<PropertyValue>, ParseError> {
        let span = scan::trim_code(self.src, span);
        let text = &self.src[span.clone()];

        if self.is_closure(span.clone()) {
            return Ok(None);
        }
        if let Some(node) = self.parse_expression(span.clone(), depth + 1)? {
            return Ok(Some(PropertyValue::Widget(Box::new(node))));
        }
        if let Some(inner) = self.list_literal(span.clone()) {
            self.check_depth(depth + 1, span.start)?;
            let mut items = Vec::new();
            for item in scan::split_top_level(self.src, inner, b',') {
                if let Some(value) = self.classify_value(item, depth + 1)? {
                    items.push(value);
                }
            }
            return Ok(Some(PropertyValue::List(items)));
        }
        if let Some(inner) = self.map_literal(span.clone()) {
            return Ok(Some(match self.style_map(inner) {
                Some(map) => PropertyValue::Style(map),
                None => PropertyValue::Opaque(text.to_string()),
            }));
        }
        Ok(Some(scalar_value(text)))
    }

    /// `(a, b) { … }`, `() => …`, `(x) async { … }`.
    fn is_closure(&self, span: Span) -> bool {
        if !self.src[span.clone()].starts_with('(') {
            return false;
        }
        let Ok(close) = scan::matching_close(self.src, span.start, span.end) else {
            return false;
        };
        let rest = self.src[close + 1..span.end].trim_start();
        rest.starts_with('{') || rest.starts_with("=>") || scan::word_at(rest, 0, "async")
    }

    /// Inner span of a `[ … ]` (optionally `const` or `<T>`-typed) literal.
    fn list_literal(&self, span: Span) -> Option<Span> {
        self.bracketed(span, b'[')
    }

    /// Inner span of a `{ … }` map literal.
    fn map_literal(&self, span: Span) -> Option<Span> {
        self.bracketed(span, b'{')
    }

    fn bracketed(&self, span: Span, open: u8) -> Option<Span> {
        let mut span = self.strip_keywords(span);
        if self.src[span.clone()].starts_with('<') {
            let close = scan::matching_angle(self.src, span.clone())?;
            span = scan::trim_code(self.src, close + 1..span.end);
        }
        if self.src.as_bytes().get(span.start) != Some(&open) {
            return None;
        }
        let close = scan::matching_close(self.src, span.start, span.end).ok()?;
        (close + 1 == span.end).then_some(span.start + 1..close)
    }

    /// `{'color': 'red', 'width': 2}` → ordered string map. Any entry that is
    /// not a string key with a literal value rejects the whole map.
    fn style_map(&self, inner: Span) -> Option<IndexMap<String, String>> {
        let mut map = IndexMap::new();
        for entry in scan::split_top_level(self.src, inner, b',') {
            let colon = scan::find_top_level(self.src, entry.clone(), b':')?;
            let key = unquote(self.src[entry.start..colon].trim())?;
            let value = match scalar_value(self.src[colon + 1..entry.end].trim()) {
                PropertyValue::Str(s) => s,
                PropertyValue::Number(n) => format_number(n),
                PropertyValue::Bool(b) => b.to_string(),
                _ => return None,
            };
            map.insert(key, value);
        }
        Some(map)
    }

    /// Drop leading `const` / `new` keywords.
    fn strip_keywords(&self, span: Span) -> Span {
        let mut span = scan::trim_code(self.src, span);
        for kw in ["const", "new"] {
            if scan::word_at(self.src, span.start, kw) && span.len() > kw.len() {
                span = scan::trim_code(self.src, span.start + kw.len()..span.end);
            }
        }
        span
    }
}

// ── Scalars ───────────────────────────────────────────────────────────────

/// Everything that is not a call, list, or map.
fn scalar_value(text: &str) -> PropertyValue {
    if text.contains('$') {
        return PropertyValue::Opaque(INTERPOLATION_PLACEHOLDER.to_string());
    }
    if let Some(s) = unquote(text) {
        return PropertyValue::Str(s);
    }
    match text {
        "true" => return PropertyValue::Bool(true),
        "false" => return PropertyValue::Bool(false),
        _ => {}
    }
    if let Some(n) = parse_number(text) {
        return PropertyValue::Number(n);
    }
    // Member access, indexing, and out-of-range numerals such as `1e400`
    // (no identifier starts with a digit).
    let numeral = text.trim_start_matches('-').starts_with(|c: char| c.is_ascii_digit());
    if text.contains('.') || text.contains('[') || numeral {
        return PropertyValue::Opaque(text.to_string());
    }
    PropertyValue::Str(text.to_string())
}

/// Contents of a single string literal, escapes resolved. `None` if `text`
/// is not exactly one literal (`'a' + b` is not).
fn unquote(text: &str) -> Option<String> {
    let (raw, body) = match text.as_bytes().first()? {
        b'r' | b'R' => (true, &text[1..]),
        _ => (false, text),
    };
    let quote = *body.as_bytes().first()?;
    if quote != b'\'' && quote != b'"' {
        return None;
    }
    // The scanner steps over exactly one literal; anything left means more
    // than a single string.
    if Scanner::new(text, 0..text.len()).next_significant().is_some() {
        return None;
    }
    let q = quote as char;
    let delim_len = if body.len() >= 6 && body.starts_with(&format!("{q}{q}{q}")) { 3 } else { 1 };
    if body.len() < delim_len * 2 {
        return None;
    }
    let inner = &body[delim_len..body.len() - delim_len];
    Some(if raw { inner.to_string() } else { unescape(inner) })
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn parse_number(text: &str) -> Option<f64> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text),
    };
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| sign * v as f64);
    }
    if !digits.starts_with(|c: char| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| sign * v)
}

/// Numbers as Dart and JavaScript both write them: `20`, not `20.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// The constructor name before `(`: dotted identifiers, with any `<T>` type
/// arguments removed.
fn constructor_name(text: &str) -> Option<&str> {
    let text = text.trim();
    let name = match text.find('<') {
        Some(lt) if text.ends_with('>') => text[..lt].trim_end(),
        Some(_) => return None,
        None => text,
    };
    (!name.is_empty() && name.split('.').all(scan::is_identifier)).then_some(name)
}

fn snippet(text: &str) -> String {
    const MAX: usize = 60;
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX {
        let cut: String = flat.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        flat
    }
}

// ── Public parse entry points ─────────────────────────────────────────────

/// Parse the `build` method of a Dart source string into a [`WidgetTree`].
pub fn parse_str(src: &str) -> Result<WidgetTree, ParseError> {
    Parser::new(src).parse_tree()
}

/// [`parse_str`] with explicit options.
pub fn parse_str_with(src: &str, options: ParseOptions) -> Result<WidgetTree, ParseError> {
    Parser::with_options(src, options).parse_tree()
}
