//! Structural checks run between parsing and rendering.

use vortex_dart::{PropertyValue, WidgetNode, WidgetTree};

use crate::catalog;
use crate::error::GenerateError;
use crate::ident::{is_valid_ident, normalize_ident};

enum Work<'t> {
    Node { node: &'t WidgetNode, path: String, depth: usize },
    Value { value: &'t PropertyValue, path: String, depth: usize },
}

/// Check `tree` before any text is emitted.
///
/// Rejects names and keys that cannot become JavaScript identifiers,
/// built-in kinds missing a required slot, non-finite numbers, and widget
/// nesting deeper than `max_depth`. The first problem found is returned.
/// Iterative, so a deep tree cannot overflow the stack here.
pub fn validate(tree: &WidgetTree, max_depth: usize) -> Result<(), GenerateError> {
    let mut stack = vec![Work::Node { node: &tree.root, path: tree.root.name.clone(), depth: 0 }];

    while let Some(work) = stack.pop() {
        match work {
            Work::Node { node, path, depth } => {
                check_node(node, &path, depth, max_depth)?;
                let mut next = Vec::new();
                for (key, value) in &node.properties {
                    next.push(Work::Value { value, path: format!("{path}/{key}"), depth });
                }
                for (i, value) in node.arguments.iter().enumerate() {
                    next.push(Work::Value { value, path: format!("{path}/#{i}"), depth });
                }
                for (i, child) in node.children.iter().enumerate() {
                    next.push(Work::Node {
                        node: child,
                        path: format!("{path}/children[{i}]:{}", child.name),
                        depth: depth + 1,
                    });
                }
                stack.extend(next.into_iter().rev());
            }
            Work::Value { value, path, depth } => match value {
                PropertyValue::Widget(node) => {
                    stack.push(Work::Node { node, path: format!("{path}:{}", node.name), depth: depth + 1 });
                }
                PropertyValue::List(items) => {
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push(Work::Value { value: item, path: format!("{path}[{i}]"), depth: depth + 1 });
                    }
                }
                PropertyValue::Number(n) if !n.is_finite() => {
                    return Err(GenerateError::invalid(path, format!("number {n} has no literal form")));
                }
                PropertyValue::Str(_)
                | PropertyValue::Number(_)
                | PropertyValue::Bool(_)
                | PropertyValue::Opaque(_)
                | PropertyValue::Style(_) => {}
            },
        }
    }
    Ok(())
}

fn check_node(node: &WidgetNode, path: &str, depth: usize, max_depth: usize) -> Result<(), GenerateError> {
    if depth > max_depth {
        return Err(GenerateError::invalid(path, format!("widgets nested more than {max_depth} levels deep")));
    }
    if !is_valid_ident(&node.name) {
        return Err(GenerateError::invalid(path, format!("`{}` is not a valid widget name", node.name)));
    }
    for key in node.properties.keys() {
        if !is_valid_ident(key) || normalize_ident(key).is_empty() {
            return Err(GenerateError::invalid(path, format!("`{key}` is not a valid property name")));
        }
    }
    if let Some(info) = catalog::lookup(&node.name) {
        for slot in info.slots.iter().filter(|s| s.required) {
            match slot.value_in(node) {
                None => {
                    return Err(GenerateError::invalid(path, format!("{} requires `{}`", info.name, slot.name)));
                }
                Some(PropertyValue::List(_)) => {
                    return Err(GenerateError::invalid(path, format!("`{}` of {} cannot be a list", slot.name, info.name)));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
