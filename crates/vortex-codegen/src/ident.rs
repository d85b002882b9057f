//! Dart names to JavaScript identifiers.

use crate::catalog;

/// Names whose emitted form is fixed regardless of the general rule.
const EXCEPTIONS: &[(&str, &str)] = &[("ThemeData", "themeData")];

/// Normalize a property key or generic widget name.
///
/// `main_axis_alignment` → `mainAxisAlignment`, `EdgeInsets_all` →
/// `edgeInsetsAll`. Built-in kind names are returned unchanged. The result
/// depends on the input alone, so a name normalizes the same way everywhere
/// in a tree.
pub fn normalize_ident(name: &str) -> String {
    if let Some((_, fixed)) = EXCEPTIONS.iter().find(|(from, _)| *from == name) {
        return (*fixed).to_string();
    }
    if catalog::lookup(name).is_some() {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('_').filter(|s| !s.is_empty()).enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Whether `s` is usable as a bare JavaScript identifier or object key.
pub fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_to_camel() {
        assert_eq!(normalize_ident("main_axis_alignment"), "mainAxisAlignment");
    }

    #[test]
    fn camel_case_is_unchanged() {
        assert_eq!(normalize_ident("mainAxisAlignment"), "mainAxisAlignment");
        assert_eq!(normalize_ident("fontSize"), "fontSize");
    }

    #[test]
    fn flattened_constructor() {
        assert_eq!(normalize_ident("EdgeInsets_all"), "edgeInsetsAll");
        assert_eq!(normalize_ident("Container"), "container");
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(normalize_ident("_private__name_"), "privateName");
        assert_eq!(normalize_ident("___"), "");
    }

    #[test]
    fn exceptions_and_kinds() {
        assert_eq!(normalize_ident("ThemeData"), "themeData");
        assert_eq!(normalize_ident("Scaffold"), "Scaffold");
        assert_eq!(normalize_ident("FloatingActionButton"), "FloatingActionButton");
    }

    #[test]
    fn identifiers() {
        assert!(is_valid_ident("appBar"));
        assert!(is_valid_ident("$x"));
        assert!(!is_valid_ident("9lives"));
        assert!(!is_valid_ident("a-b"));
        assert!(!is_valid_ident(""));
    }
}
