//! User-authored components: detection, collection, and stub emission.

use indexmap::IndexSet;
use vortex_dart::{PropertyValue, WidgetNode, WidgetTree};

use crate::catalog;

pub const DEFAULT_PREFIXES: &[&str] = &["My", "Custom"];

// ── Registry ──────────────────────────────────────────────────────────────

/// Decides which widget names refer to user components.
///
/// Names declared as widget classes in the document are components. Names
/// starting with one of the configured prefixes are too, for components
/// defined in other files. Built-in kinds and data classes never are.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    declared: IndexSet<String>,
    prefixes: Vec<String>,
}

impl ComponentRegistry {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { declared: IndexSet::new(), prefixes: prefixes.into_iter().map(Into::into).collect() }
    }

    pub fn declare(&mut self, name: impl Into<String>) {
        self.declared.insert(name.into());
    }

    pub fn with_declared<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.declare(name);
        }
        self
    }

    pub fn is_component(&self, name: &str) -> bool {
        if catalog::lookup(name).is_some() || catalog::is_data_class(name) {
            return false;
        }
        self.declared.contains(name)
            || self.prefixes.iter().any(|p| {
                name.strip_prefix(p.as_str()).is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
            })
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES.iter().copied())
    }
}

// ── Collection ────────────────────────────────────────────────────────────

/// Every user component referenced anywhere in the rendered part of the
/// tree, once each, in pre-order.
///
/// Walks properties, positional arguments, and children. List values are
/// never rendered, so components inside them are not collected.
pub fn collect_user_components(tree: &WidgetTree, registry: &ComponentRegistry) -> IndexSet<String> {
    let mut found = IndexSet::new();
    let mut stack: Vec<&WidgetNode> = vec![&tree.root];

    while let Some(node) = stack.pop() {
        if registry.is_component(&node.name) {
            found.insert(node.name.clone());
        }
        let nested = node
            .properties
            .values()
            .chain(node.arguments.iter())
            .filter_map(PropertyValue::as_widget)
            .chain(node.children.iter());
        // Reversed so the first nested node is visited next.
        let start = stack.len();
        stack.extend(nested);
        stack[start..].reverse();
    }
    found
}

// ── Stubs ─────────────────────────────────────────────────────────────────

/// Class definition standing in for a user component.
///
/// The stub does not guess at the component's body. It renders whatever
/// build function the page registered under `window.vortexComponents[name]`,
/// or a placeholder element marked with `data-component`.
pub fn emit_component_stub(name: &str) -> String {
    format!(
        "class {name} extends VortexComponent {{\n  \
           build() {{\n    \
             return this.external('{name}') ?? this.placeholder('{name}');\n  \
           }}\n\
         }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(node: WidgetNode) -> PropertyValue {
        PropertyValue::Widget(Box::new(node))
    }

    #[test]
    fn prefix_convention() {
        let reg = ComponentRegistry::default();
        assert!(reg.is_component("MyCard"));
        assert!(reg.is_component("CustomHeader"));
        assert!(!reg.is_component("Mystery"));
        assert!(!reg.is_component("My"));
        assert!(!reg.is_component("Column"));
    }

    #[test]
    fn declared_names() {
        let reg = ComponentRegistry::new(Vec::<String>::new()).with_declared(["CounterPage"]);
        assert!(reg.is_component("CounterPage"));
        assert!(!reg.is_component("MyCard"));
    }

    #[test]
    fn built_ins_are_never_components() {
        let reg = ComponentRegistry::default().with_declared(["Text", "ThemeData"]);
        assert!(!reg.is_component("Text"));
        assert!(!reg.is_component("ThemeData"));
    }

    #[test]
    fn collects_through_props_args_and_children_once() {
        let root = WidgetNode::new("Scaffold")
            .with_prop("appBar", w(WidgetNode::new("MyBar")))
            .with_prop(
                "body",
                w(WidgetNode::new("Column")
                    .with_child(WidgetNode::new("MyCard"))
                    .with_child(WidgetNode::new("Center").with_prop("child", w(WidgetNode::new("MyCard"))))),
            )
            .with_prop("floatingActionButton", w(WidgetNode::new("Wrap").with_arg(w(WidgetNode::new("MyCard")))));
        let found = collect_user_components(&WidgetTree::new(root), &ComponentRegistry::default());
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["MyBar", "MyCard"]);
    }

    #[test]
    fn lists_are_not_walked() {
        let root = WidgetNode::new("AppBar").with_prop("actions", PropertyValue::List(vec![w(WidgetNode::new("MyAction"))]));
        assert!(collect_user_components(&WidgetTree::new(root), &ComponentRegistry::default()).is_empty());
    }

    #[test]
    fn stub_references_external_build() {
        let stub = emit_component_stub("MyCard");
        assert!(stub.starts_with("class MyCard extends VortexComponent {"));
        assert!(stub.contains("this.external('MyCard')"));
        assert!(stub.contains("this.placeholder('MyCard')"));
    }
}
