use indexmap::IndexMap;
use serde::Serialize;

// ── PropertyValue ─────────────────────────────────────────────────────────

/// The value assigned to a named (or positional) constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Quoted string with the quotes stripped: `'Hello'`
    Str(String),
    /// Numeric literal: `16`, `0.75`
    Number(f64),
    /// `true` / `false`
    Bool(bool),
    /// Nested constructor call: `title: Text('Hi')`
    Widget(Box<WidgetNode>),
    /// List literal on any property other than `children`.
    ///
    /// Recorded so the tree is faithful to the source, but never rendered.
    List(Vec<PropertyValue>),
    /// Source text passed through verbatim (member access, indexing,
    /// interpolation placeholder). Nothing about it is checked.
    Opaque(String),
    /// Map literal with string keys and literal values.
    Style(IndexMap<String, String>),
}

impl PropertyValue {
    pub fn as_widget(&self) -> Option<&WidgetNode> {
        match self {
            PropertyValue::Widget(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

// ── WidgetNode ────────────────────────────────────────────────────────────

/// One constructor-call expression.
///
/// ```dart
/// Column(
///   mainAxisAlignment: MainAxisAlignment.center,
///   children: [Text('a'), Text('b')],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetNode {
    /// Constructor name; `Image.network` is flattened to `Image_network`.
    pub name: String,
    /// Named arguments in source order. A repeated name keeps its first
    /// position and its last value.
    pub properties: IndexMap<String, PropertyValue>,
    /// Positional arguments in source order: `Text('Hi')` → `['Hi']`.
    pub arguments: Vec<PropertyValue>,
    /// Widgets from a `children: [...]` list literal.
    pub children: Vec<WidgetNode>,
}

impl WidgetNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up a named argument.
    pub fn prop(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Positional argument `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&PropertyValue> {
        self.arguments.get(index)
    }

    /// Builder-style helper, mostly for constructing trees by hand in tests.
    pub fn with_prop(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_arg(mut self, value: PropertyValue) -> Self {
        self.arguments.push(value);
        self
    }

    pub fn with_child(mut self, child: WidgetNode) -> Self {
        self.children.push(child);
        self
    }
}

// ── WidgetTree ────────────────────────────────────────────────────────────

/// The parsed `build` method of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetTree {
    pub root: WidgetNode,
}

impl WidgetTree {
    pub fn new(root: WidgetNode) -> Self {
        Self { root }
    }
}
