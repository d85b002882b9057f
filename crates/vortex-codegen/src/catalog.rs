//! Static catalogue of the built-in widget kinds: which named arguments are
//! slots, where they sit in the emitted call, and which are required.

use vortex_dart::{PropertyValue, WidgetNode};

// ── Slot kinds ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A nested widget: `body: Center(...)`.
    Widget,
    /// Display text; strings, numbers, and passthrough expressions.
    Text,
    /// An icon name; `Icons.add` lowers to `'add'`.
    Icon,
    /// Any value, rendered as-is.
    Value,
}

// ── Slot info ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SlotInfo {
    pub name: &'static str,
    /// Positional index that may supply the slot when the named argument is
    /// absent: `Text('Hi')` fills `data` from position 0.
    pub position: Option<usize>,
    pub required: bool,
    pub kind: SlotKind,
}

impl SlotInfo {
    const fn named(name: &'static str, kind: SlotKind) -> Self {
        Self { name, position: None, required: false, kind }
    }

    /// The value filling this slot on `node`, named argument first.
    pub fn value_in<'n>(&self, node: &'n WidgetNode) -> Option<&'n PropertyValue> {
        node.prop(self.name).or_else(|| self.position.and_then(|i| node.arg(i)))
    }
}

// ── Widget info ───────────────────────────────────────────────────────────

pub struct WidgetInfo {
    pub name: &'static str,
    pub doc: &'static str,
    /// In emitted call order.
    pub slots: &'static [SlotInfo],
}

impl WidgetInfo {
    pub fn is_slot(&self, key: &str) -> bool {
        self.slots.iter().any(|s| s.name == key)
    }

    /// Positional indices consumed by slots.
    pub fn slot_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|s| s.position)
    }
}

// ── Widget registry ───────────────────────────────────────────────────────

pub static WIDGETS: &[WidgetInfo] = &[
    WidgetInfo {
        name: "MaterialApp",
        doc: "Application root. `home` is the first page; `theme` sets the primary color.",
        slots: &[SlotInfo::named("home", SlotKind::Widget), SlotInfo::named("theme", SlotKind::Value)],
    },
    WidgetInfo {
        name: "Scaffold",
        doc: "Page frame with an app bar, a body, and a floating action button.",
        slots: &[
            SlotInfo::named("appBar", SlotKind::Widget),
            SlotInfo::named("body", SlotKind::Widget),
            SlotInfo::named("floatingActionButton", SlotKind::Widget),
        ],
    },
    WidgetInfo {
        name: "AppBar",
        doc: "Title bar. Children, if any, become trailing actions.",
        slots: &[SlotInfo::named("title", SlotKind::Widget)],
    },
    WidgetInfo {
        name: "Center",
        doc: "Centers its child both ways.",
        slots: &[SlotInfo::named("child", SlotKind::Widget)],
    },
    WidgetInfo {
        name: "Column",
        doc: "Vertical flex stack of `children`.",
        slots: &[],
    },
    WidgetInfo {
        name: "Row",
        doc: "Horizontal flex stack of `children`.",
        slots: &[],
    },
    WidgetInfo {
        name: "Text",
        doc: "Text leaf. The string comes from the first positional argument or `data`.",
        slots: &[SlotInfo { name: "data", position: Some(0), required: true, kind: SlotKind::Text }],
    },
    WidgetInfo {
        name: "ElevatedButton",
        doc: "Raised button. `onPressed` names the handler method.",
        slots: &[SlotInfo { name: "child", position: None, required: true, kind: SlotKind::Widget }],
    },
    WidgetInfo {
        name: "SizedBox",
        doc: "Fixed-size box or spacer.",
        slots: &[SlotInfo::named("child", SlotKind::Widget)],
    },
    WidgetInfo {
        name: "FloatingActionButton",
        doc: "Round button pinned to the bottom-right corner.",
        slots: &[SlotInfo::named("child", SlotKind::Widget)],
    },
    WidgetInfo {
        name: "Icon",
        doc: "Material icon by name: `Icon(Icons.add)`.",
        slots: &[SlotInfo { name: "icon", position: Some(0), required: true, kind: SlotKind::Icon }],
    },
];

/// Constructors that describe configuration rather than UI. They lower to a
/// plain object of their properties.
pub static DATA_CLASSES: &[&str] = &["ThemeData", "TextStyle", "BoxDecoration"];

pub fn lookup(name: &str) -> Option<&'static WidgetInfo> {
    WIDGETS.iter().find(|w| w.name == name)
}

pub fn is_data_class(name: &str) -> bool {
    DATA_CLASSES.contains(&name)
}
