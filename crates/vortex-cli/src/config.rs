//! `vortex.toml` loading and option resolution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vortex_codegen::{DEFAULT_PREFIXES, GenerateOptions};
use vortex_dart::{DEFAULT_MAX_DEPTH, ParseOptions};

pub const CONFIG_FILE: &str = "vortex.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VortexConfig {
    pub compiler: CompilerConfig,
    /// Directory of the file this was loaded from; relative paths in the
    /// file resolve against it.
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub style_extension: bool,
    pub component_prefixes: Vec<String>,
    pub max_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            style_extension: false,
            component_prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl VortexConfig {
    /// Read an explicit config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: VortexConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.origin = path.parent().map(Path::to_path_buf);
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Nearest `vortex.toml` in `start` or one of its ancestors.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start.ancestors().map(|dir| dir.join(CONFIG_FILE)).find(|p| p.is_file())
    }

    /// Search from the source directory, then from the working directory.
    /// No file anywhere means defaults.
    pub fn discover(source_dir: &Path) -> Result<Self> {
        let from_cwd = || std::env::current_dir().ok().and_then(|cwd| Self::find(&cwd));
        match Self::find(source_dir).or_else(from_cwd) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("no {CONFIG_FILE} found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `--output` flag, then `compiler.output_dir`, then `dist`.
    pub fn resolve_output_dir(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }
        match (&self.compiler.output_dir, &self.origin) {
            (Some(dir), Some(origin)) if dir.is_relative() => origin.join(dir),
            (Some(dir), _) => dir.clone(),
            (None, _) => PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { max_depth: self.compiler.max_depth }
    }

    /// Generator options for one document. `style_extension` from the CLI
    /// can only switch the extension on.
    pub fn generate_options(&self, style_extension: bool, declared_components: Vec<String>) -> GenerateOptions {
        GenerateOptions {
            style_extension: style_extension || self.compiler.style_extension,
            component_prefixes: self.compiler.component_prefixes.clone(),
            declared_components,
            max_depth: self.compiler.max_depth,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fresh empty directory under the system temp dir.
    pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("vortex-{tag}-{}-{n}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config: VortexConfig = toml::from_str("").unwrap();
        assert_eq!(config.compiler, CompilerConfig::default());
        assert_eq!(config.compiler.component_prefixes, vec!["My", "Custom"]);
        assert_eq!(config.compiler.max_depth, 128);
    }

    #[test]
    fn partial_section() {
        let config: VortexConfig = toml::from_str("[compiler]\nstyle_extension = true\n").unwrap();
        assert!(config.compiler.style_extension);
        assert_eq!(config.compiler.output_dir, None);
    }

    #[test]
    fn output_dir_resolution_order() {
        let mut config = VortexConfig::default();
        assert_eq!(config.resolve_output_dir(None), PathBuf::from("dist"));

        config.compiler.output_dir = Some(PathBuf::from("build/web"));
        assert_eq!(config.resolve_output_dir(None), PathBuf::from("build/web"));

        config.origin = Some(PathBuf::from("/proj"));
        assert_eq!(config.resolve_output_dir(None), PathBuf::from("/proj/build/web"));

        assert_eq!(config.resolve_output_dir(Some(Path::new("out"))), PathBuf::from("out"));
    }

    #[test]
    fn load_records_origin() {
        let dir = scratch_dir("config");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "[compiler]\noutput_dir = \"public\"\nmax_depth = 64\n").unwrap();

        let config = VortexConfig::load(&path).unwrap();
        assert_eq!(config.compiler.max_depth, 64);
        assert_eq!(config.resolve_output_dir(None), dir.join("public"));
    }

    #[test]
    fn find_walks_ancestors() {
        let dir = scratch_dir("find");
        let nested = dir.join("lib").join("pages");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.join(CONFIG_FILE), "").unwrap();
        assert_eq!(VortexConfig::find(&nested), Some(dir.join(CONFIG_FILE)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = scratch_dir("missing");
        assert!(VortexConfig::load(&dir.join(CONFIG_FILE)).is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = scratch_dir("bad");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "[compiler\n").unwrap();
        let err = VortexConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }

    #[test]
    fn cli_flag_only_enables_extension() {
        let mut config = VortexConfig::default();
        assert!(config.generate_options(true, Vec::new()).style_extension);
        config.compiler.style_extension = true;
        assert!(config.generate_options(false, Vec::new()).style_extension);
    }
}
