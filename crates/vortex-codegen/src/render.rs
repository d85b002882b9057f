//! Lowering a validated widget tree into JavaScript expressions.

use vortex_dart::parser::format_number;
use vortex_dart::{PropertyValue, WidgetNode};

use crate::catalog::{self, SlotKind, WidgetInfo};
use crate::components::ComponentRegistry;
use crate::ident::normalize_ident;

pub struct Renderer<'r> {
    registry: &'r ComponentRegistry,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self { registry }
    }

    /// One widget as a call expression:
    ///
    /// | Node | Emitted |
    /// |------|---------|
    /// | built-in kind | `this.Kind(slot…, {props}, [children])` |
    /// | user component | `new Name({props}, [children])` |
    /// | data class | `{props}` |
    /// | anything else | `this.generic('name', {props}, [children][, [args]])` |
    pub fn render_node(&self, node: &WidgetNode) -> String {
        if let Some(info) = catalog::lookup(&node.name) {
            return self.render_builtin(info, node);
        }
        if catalog::is_data_class(&node.name) {
            return self.render_properties(node, None);
        }

        let props = self.render_properties(node, None);
        let children = self.render_children(node);
        if self.registry.is_component(&node.name) {
            if !node.arguments.is_empty() {
                log::debug!("{}: positional arguments are not passed to components", node.name);
            }
            return format!("new {}({props}, {children})", node.name);
        }

        let name = js_string(&normalize_ident(&node.name));
        let args: Vec<String> = node
            .arguments
            .iter()
            .filter(|a| !is_list(node, a))
            .map(|a| self.render_value(a))
            .collect();
        if args.is_empty() {
            format!("this.generic({name}, {props}, {children})")
        } else {
            format!("this.generic({name}, {props}, {children}, [{}])", args.join(", "))
        }
    }

    fn render_builtin(&self, info: &WidgetInfo, node: &WidgetNode) -> String {
        let mut parts: Vec<String> = info
            .slots
            .iter()
            .map(|slot| match slot.value_in(node) {
                Some(value) => self.render_slot(slot.kind, value),
                None => "null".to_string(),
            })
            .collect();

        let consumed: Vec<usize> = info.slot_positions().collect();
        for (i, arg) in node.arguments.iter().enumerate() {
            if !consumed.contains(&i) {
                log::debug!("{}: dropped positional argument {i}: {arg:?}", node.name);
            }
        }

        parts.push(self.render_properties(node, Some(info)));
        parts.push(self.render_children(node));
        format!("this.{}({})", info.name, parts.join(", "))
    }

    fn render_slot(&self, kind: SlotKind, value: &PropertyValue) -> String {
        match (kind, value) {
            (SlotKind::Icon, PropertyValue::Opaque(text)) => match text.strip_prefix("Icons.") {
                Some(icon) if !icon.contains(['.', '[', '(']) => js_string(icon),
                _ => text.clone(),
            },
            _ => self.render_value(value),
        }
    }

    /// Generic properties as an object literal. Skips `children`, the slots
    /// of `info`, and list values.
    pub fn render_properties(&self, node: &WidgetNode, info: Option<&WidgetInfo>) -> String {
        let pairs: Vec<String> = node
            .properties
            .iter()
            .filter(|(key, _)| key.as_str() != "children")
            .filter(|(key, _)| !info.is_some_and(|i| i.is_slot(key)))
            .filter(|(_, value)| !is_list(node, value))
            .map(|(key, value)| format!("{}: {}", normalize_ident(key), self.render_value(value)))
            .collect();

        if pairs.is_empty() { "{}".to_string() } else { format!("{{{}}}", pairs.join(", ")) }
    }

    fn render_children(&self, node: &WidgetNode) -> String {
        let children: Vec<String> = node.children.iter().map(|c| self.render_node(c)).collect();
        format!("[{}]", children.join(", "))
    }

    pub fn render_value(&self, value: &PropertyValue) -> String {
        match value {
            PropertyValue::Str(s) => js_string(s),
            PropertyValue::Number(n) => format_number(*n),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Widget(node) => self.render_node(node),
            // Lists other than `children` never reach the output.
            PropertyValue::List(_) => "null".to_string(),
            // Trusted to be valid JavaScript already.
            PropertyValue::Opaque(text) => text.clone(),
            PropertyValue::Style(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", js_string(k), js_string(v))).collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }
}

fn is_list(node: &WidgetNode, value: &PropertyValue) -> bool {
    let list = matches!(value, PropertyValue::List(_));
    if list {
        log::debug!("{}: list value is not rendered", node.name);
    }
    list
}

/// Single-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
