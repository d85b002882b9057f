//! Static files written next to every generated `app.js`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub const INDEX_HTML: &str = include_str!("../assets/index.html");
pub const STYLES_CSS: &str = include_str!("../assets/styles.css");

const FILES: &[(&str, &str)] = &[("index.html", INDEX_HTML), ("styles.css", STYLES_CSS)];

/// Write the HTML shell and stylesheet into `out_dir`, replacing any
/// existing copies.
pub fn write_assets(out_dir: &Path) -> Result<()> {
    for (name, contents) in FILES {
        let path = out_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_mounts_app_script() {
        assert!(INDEX_HTML.contains(r#"<div class="app"></div>"#));
        assert!(INDEX_HTML.contains(r#"<script src="app.js"></script>"#));
        assert!(INDEX_HTML.contains(r#"href="styles.css""#));
    }

    #[test]
    fn stylesheet_covers_builtin_classes() {
        for class in [".scaffold", ".app-bar", ".elevated-button", ".floating-action-button", ".material-icons"] {
            assert!(STYLES_CSS.contains(class), "missing {class}");
        }
    }
}
