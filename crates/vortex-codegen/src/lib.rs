//! JavaScript generation from parsed Dart widget trees.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`catalog`] | built-in widget kinds and their slots |
//! | [`components`] | user-component registry, collection, stubs |
//! | [`error`] | `GenerateError` |
//! | [`ident`] | identifier normalization |
//! | [`render`] | node and value lowering |
//! | [`runtime`] | the bundled browser runtime |
//! | [`validate`] | pre-render structural checks |
//!
//! # Quick start
//!
//! ```rust
//! use vortex_codegen::Generator;
//!
//! let tree = vortex_dart::parse_str(
//!     "Widget build(BuildContext context) { return Center(child: Text('Hi')); }",
//! ).unwrap();
//! let js = Generator::default().generate(&tree).unwrap();
//! assert!(js.contains("return this.Center(this.Text('Hi', {}, []), {}, []);"));
//! ```

pub mod catalog;
pub mod components;
pub mod error;
pub mod ident;
pub mod render;
pub mod runtime;
pub mod validate;

use vortex_dart::{DEFAULT_MAX_DEPTH, WidgetTree};

pub use components::{ComponentRegistry, DEFAULT_PREFIXES, collect_user_components, emit_component_stub};
pub use error::GenerateError;
pub use ident::normalize_ident;
pub use render::Renderer;
pub use validate::validate;

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Load the extension stylesheet and set `VORTEX_STYLE_EXTENSION`.
    pub style_extension: bool,
    /// Name prefixes marking user components defined elsewhere.
    pub component_prefixes: Vec<String>,
    /// Widget classes declared in the source document.
    pub declared_components: Vec<String>,
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            style_extension: false,
            component_prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            declared_components: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ── Generator ─────────────────────────────────────────────────────────────

/// Turns one [`WidgetTree`] into a self-contained `app.js`.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    /// Source file name, mentioned in the banner.
    pub source: Option<String>,
    pub options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { source: None, options }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn registry(&self) -> ComponentRegistry {
        ComponentRegistry::new(self.options.component_prefixes.iter().cloned())
            .with_declared(self.options.declared_components.iter().cloned())
    }

    /// Validate `tree`, then emit: banner, feature constants, runtime,
    /// component stubs, `class App`, and the mount call.
    pub fn generate(&self, tree: &WidgetTree) -> Result<String, GenerateError> {
        validate(tree, self.options.max_depth)?;

        let registry = self.registry();
        let components = collect_user_components(tree, &registry);
        log::debug!("{} user component(s): {:?}", components.len(), components);
        let body = Renderer::new(&registry).render_node(&tree.root);

        let mut out = match &self.source {
            Some(src) => format!("// Generated by vortex from {src}. Do not edit.\n"),
            None => "// Generated by vortex. Do not edit.\n".to_string(),
        };
        out.push('\n');
        out.push_str(&self.feature_lines());
        out.push('\n');
        out.push_str(runtime::RUNTIME_JS);
        for name in &components {
            out.push('\n');
            out.push_str(&emit_component_stub(name));
        }
        out.push('\n');
        out.push_str(&format!(
            "class App extends VortexComponent {{\n  \
               constructor(props = {{}}, children = []) {{\n    \
                 super(props, children);\n    \
                 this.isRoot = true;\n  \
               }}\n\n  \
               build() {{\n    \
                 return {body};\n  \
               }}\n\
             }}\n\n\
             document.addEventListener('DOMContentLoaded', () => {{\n  \
               window.app = new App();\n  \
               window.app.mount('.app');\n\
             }});\n"
        ));
        Ok(out)
    }

    fn feature_lines(&self) -> String {
        let mut sheets: Vec<&str> = runtime::BASE_STYLESHEETS.to_vec();
        if self.options.style_extension {
            sheets.push(runtime::STYLE_EXTENSION_STYLESHEET);
        }
        let sheets: Vec<String> = sheets.into_iter().map(render::js_string).collect();
        format!(
            "const VORTEX_STYLESHEETS = [\n  {},\n];\nconst VORTEX_STYLE_EXTENSION = {};\n",
            sheets.join(",\n  "),
            self.options.style_extension
        )
    }
}
