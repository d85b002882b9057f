//! The browser runtime emitted ahead of every generated application.

/// `VortexComponent`, its built-in builders, compatibility namespaces for
/// passthrough expressions, delegated event wiring, and the router.
///
/// Expects `VORTEX_STYLESHEETS` and `VORTEX_STYLE_EXTENSION` to be defined
/// before it.
pub const RUNTIME_JS: &str = include_str!("runtime.js");

/// Stylesheets every application loads.
pub const BASE_STYLESHEETS: &[&str] = &[
    "https://fonts.googleapis.com/icon?family=Material+Icons",
    "https://fonts.googleapis.com/css2?family=Roboto:wght@300;400;500;700&display=swap",
];

/// Added when the style extension is enabled.
pub const STYLE_EXTENSION_STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/flutterwind@latest/dist/flutterwind.min.css";
