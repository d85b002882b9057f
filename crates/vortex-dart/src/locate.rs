//! Finding the `build` declaration and its return expression in a document.

use crate::error::{ParseError, ParseErrorKind};
use crate::scan::{self, Scanner, Span};

/// How the located `build` method returns its widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationBody {
    /// `{ … return expr; … }`: the span between the braces.
    Block(Span),
    /// `=> expr;`: the span of `expr`.
    Arrow(Span),
}

/// The first `Widget build(BuildContext context)` declaration in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Span of the whole signature, from `Widget` to the start of the body.
    pub signature: Span,
    pub body: DeclarationBody,
}

/// A user-authored widget class: `class MyPage extends StatelessWidget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDecl {
    pub name: String,
    pub base: String,
}

const WIDGET_BASES: &[&str] = &["StatelessWidget", "StatefulWidget", "Widget"];

// ── Declaration ───────────────────────────────────────────────────────────

/// Locate the first `build` declaration. Only the first match is used.
pub fn locate_declaration(src: &str) -> Result<Declaration, ParseError> {
    let mut scanner = Scanner::new(src, 0..src.len());
    while let Some((i, b)) = scanner.next_significant() {
        if b != b'W' || !scan::word_at(src, i, "Widget") {
            continue;
        }
        if let Some(decl) = match_signature(src, i)? {
            log::debug!("found build declaration: {}", src[decl.signature.clone()].trim_end());
            return Ok(decl);
        }
    }
    Err(ParseError::new(
        ParseErrorKind::DeclarationNotFound,
        "no `Widget build(BuildContext context)` method found",
        1,
        1,
    ))
}

/// Try to read `Widget build(BuildContext <ident>)` followed by a body at
/// `start`. `Ok(None)` means the text there is not a build signature.
fn match_signature(src: &str, start: usize) -> Result<Option<Declaration>, ParseError> {
    let mut at = scan::skip_ws(src, start + "Widget".len());
    if !scan::word_at(src, at, "build") {
        return Ok(None);
    }
    at = scan::skip_ws(src, at + "build".len());
    if src.as_bytes().get(at) != Some(&b'(') {
        return Ok(None);
    }
    at = scan::skip_ws(src, at + 1);
    if !scan::word_at(src, at, "BuildContext") {
        return Ok(None);
    }
    at = scan::skip_ws(src, at + "BuildContext".len());
    let Some(param) = scan::ident_at(src, at) else {
        return Ok(None);
    };
    at = scan::skip_ws(src, param.end);
    if src.as_bytes().get(at) != Some(&b')') {
        return Ok(None);
    }
    at = scan::skip_ws(src, at + 1);

    let signature = start..at;
    if src.as_bytes().get(at) == Some(&b'{') {
        let close = scan::matching_close(src, at, src.len()).map_err(|u| {
            ParseError::at(ParseErrorKind::MalformedExpression, u.describe(), src, u.offset())
        })?;
        return Ok(Some(Declaration { signature, body: DeclarationBody::Block(at + 1..close) }));
    }
    if src[at..].starts_with("=>") {
        let expr_start = at + 2;
        let Some(semi) = scan::find_top_level(src, expr_start..src.len(), b';') else {
            return Err(ParseError::at(
                ParseErrorKind::ReturnExpressionNotFound,
                "arrow body is not terminated by ';'",
                src,
                at,
            ));
        };
        let expr = scan::trim_code(src, expr_start..semi);
        return Ok(Some(Declaration { signature, body: DeclarationBody::Arrow(expr) }));
    }
    Ok(None)
}

// ── Return expression ─────────────────────────────────────────────────────

/// Span of the expression returned by the declaration.
///
/// For block bodies this is the first `return` directly in the body, so
/// local closures and closures passed as arguments are skipped. A body whose
/// only returns sit in nested blocks (`if (x) { return A(); }`) falls back to
/// the first of those that is not inside parentheses or brackets.
pub fn locate_return_expression(src: &str, decl: &Declaration) -> Result<Span, ParseError> {
    let body = match &decl.body {
        DeclarationBody::Arrow(expr) => return non_empty(src, expr.clone(), decl.signature.start),
        DeclarationBody::Block(body) => body.clone(),
    };

    let mut parens = 0usize;
    let mut braces = 0usize;
    let mut nested = None;
    let mut scanner = Scanner::new(src, body.clone());
    while let Some((i, b)) = scanner.next_significant() {
        match b {
            b'(' | b'[' => parens += 1,
            b')' | b']' => parens = parens.saturating_sub(1),
            b'{' => braces += 1,
            b'}' => braces = braces.saturating_sub(1),
            b'r' if parens == 0 && scan::word_at(src, i, "return") => {
                if braces == 0 {
                    return return_expression(src, i, body.end);
                }
                if nested.is_none() {
                    nested = Some(i);
                }
            }
            _ => {}
        }
    }
    match nested {
        Some(i) => return_expression(src, i, body.end),
        None => Err(ParseError::at(
            ParseErrorKind::ReturnExpressionNotFound,
            "build method has no return statement",
            src,
            decl.signature.start,
        )),
    }
}

/// The expression of the `return` keyword at `at`, up to its `;`.
fn return_expression(src: &str, at: usize, end: usize) -> Result<Span, ParseError> {
    let expr_start = at + "return".len();
    let Some(semi) = scan::find_top_level(src, expr_start..end, b';') else {
        return Err(ParseError::at(
            ParseErrorKind::ReturnExpressionNotFound,
            "return statement is not terminated by ';'",
            src,
            at,
        ));
    };
    let expr = scan::trim_code(src, expr_start..semi);
    log::debug!("return expression: {}", &src[expr.clone()]);
    non_empty(src, expr, at)
}

fn non_empty(src: &str, expr: Span, anchor: usize) -> Result<Span, ParseError> {
    if expr.is_empty() {
        Err(ParseError::at(
            ParseErrorKind::ReturnExpressionNotFound,
            "build method returns nothing",
            src,
            anchor,
        ))
    } else {
        Ok(expr)
    }
}

// ── Component classes ─────────────────────────────────────────────────────

/// Every `class X extends StatelessWidget | StatefulWidget | Widget` in the
/// document, in source order.
pub fn scan_component_declarations(src: &str) -> Vec<ComponentDecl> {
    let mut found = Vec::new();
    let mut scanner = Scanner::new(src, 0..src.len());
    while let Some((i, b)) = scanner.next_significant() {
        if b != b'c' || !scan::word_at(src, i, "class") {
            continue;
        }
        let at = scan::skip_ws(src, i + "class".len());
        let Some(name) = scan::ident_at(src, at) else { continue };
        let mut at = scan::skip_ws(src, name.end);
        // Skip type parameters: `class Foo<T> extends …`
        if src.as_bytes().get(at) == Some(&b'<') {
            match src[at..].find('>') {
                Some(close) => at = scan::skip_ws(src, at + close + 1),
                None => continue,
            }
        }
        if !scan::word_at(src, at, "extends") {
            continue;
        }
        let at = scan::skip_ws(src, at + "extends".len());
        let Some(base) = scan::ident_at(src, at) else { continue };
        let base = &src[base];
        if WIDGET_BASES.contains(&base) {
            found.push(ComponentDecl { name: src[name].to_string(), base: base.to_string() });
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"
import 'package:flutter/material.dart';

class MyApp extends StatelessWidget {
  @override
  Widget build(BuildContext context) {
    final title = 'Demo';
    return MaterialApp(
      home: MyHomePage(title: title),
    );
  }
}

class MyHomePage extends StatefulWidget {
  const MyHomePage({super.key, required this.title});
  final String title;
}
"#;

    fn return_text(src: &str) -> &str {
        let decl = locate_declaration(src).unwrap();
        let span = locate_return_expression(src, &decl).unwrap();
        &src[span]
    }

    #[test]
    fn finds_block_declaration() {
        let decl = locate_declaration(COUNTER).unwrap();
        assert!(matches!(decl.body, DeclarationBody::Block(_)));
        assert!(COUNTER[decl.signature].starts_with("Widget build(BuildContext context)"));
    }

    #[test]
    fn return_expression_spans_to_semicolon() {
        assert_eq!(return_text(COUNTER), "MaterialApp(\n      home: MyHomePage(title: title),\n    )");
    }

    #[test]
    fn arrow_body() {
        let src = "Widget build(BuildContext ctx) => const Text('a;b');";
        assert_eq!(return_text(src), "const Text('a;b')");
    }

    #[test]
    fn tolerates_odd_whitespace() {
        let src = "Widget\n  build ( BuildContext  c )\n{ return Center(); }";
        assert_eq!(return_text(src), "Center()");
    }

    #[test]
    fn closure_return_is_skipped() {
        let src = "Widget build(BuildContext context) {
            final f = items.map((i) { return Text(i); });
            return Column(children: []);
        }";
        assert_eq!(return_text(src), "Column(children: [])");
    }

    #[test]
    fn local_closure_return_is_skipped() {
        let src = "Widget build(BuildContext context) { final f = () { return A(); }; return B(); }";
        assert_eq!(return_text(src), "B()");
    }

    #[test]
    fn return_inside_if_block_is_the_fallback() {
        let src = "Widget build(BuildContext context) {
            if (loading) { return Spinner(); }
            final f = items.map((i) { return Text(i); });
        }";
        assert_eq!(return_text(src), "Spinner()");
    }

    #[test]
    fn signature_in_comment_is_ignored() {
        let src = "// Widget build(BuildContext context) { return A(); }\nvoid main() {}";
        let err = locate_declaration(src).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DeclarationNotFound);
    }

    #[test]
    fn other_methods_are_not_declarations() {
        let src = "Widget buildItem(BuildContext context) { return A(); }";
        let err = locate_declaration(src).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DeclarationNotFound);
    }

    #[test]
    fn missing_return() {
        let src = "Widget build(BuildContext context) { print('x'); }";
        let decl = locate_declaration(src).unwrap();
        let err = locate_return_expression(src, &decl).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ReturnExpressionNotFound);
    }

    #[test]
    fn unterminated_return() {
        let src = "Widget build(BuildContext context) { return Text('x') }";
        let decl = locate_declaration(src).unwrap();
        let err = locate_return_expression(src, &decl).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ReturnExpressionNotFound);
    }

    #[test]
    fn component_classes() {
        let decls = scan_component_declarations(COUNTER);
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["MyApp", "MyHomePage"]);
        assert_eq!(decls[1].base, "StatefulWidget");
    }

    #[test]
    fn state_classes_are_not_components() {
        let src = "class _PageState extends State<Page> {}\nclass Model {}";
        assert!(scan_component_declarations(src).is_empty());
    }
}
