//! Widget-tree model and `build`-method parser for Dart/Flutter sources.
//!
//! The parser does not understand Dart as a whole. It finds the first
//! `Widget build(BuildContext context)` method, takes the expression it
//! returns, and reads that expression as a tree of constructor calls.
//! Everything else in the document is ignored.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `WidgetTree`, `WidgetNode`, `PropertyValue` |
//! | [`error`] | `ParseError`, `ParseErrorKind` |
//! | [`scan`] | string- and comment-aware delimiter scanning over byte spans |
//! | [`locate`] | the `build` declaration, its return expression, widget classes |
//! | [`parser`] | `parse_str` entry point, value classification |
//!
//! # Quick start
//!
//! ```rust
//! use vortex_dart::parse_str;
//!
//! let src = r#"
//!     class Hello extends StatelessWidget {
//!       @override
//!       Widget build(BuildContext context) {
//!         return Center(child: Text('Hello'));
//!       }
//!     }
//! "#;
//!
//! let tree = parse_str(src).unwrap();
//! assert_eq!(tree.root.name, "Center");
//! ```

pub mod ast;
pub mod error;
pub mod locate;
pub mod parser;
pub mod scan;

pub use ast::{PropertyValue, WidgetNode, WidgetTree};
pub use error::{ParseError, ParseErrorKind};
pub use locate::{ComponentDecl, scan_component_declarations};
pub use parser::{DEFAULT_MAX_DEPTH, INTERPOLATION_PLACEHOLDER, ParseOptions, parse_str, parse_str_with};
