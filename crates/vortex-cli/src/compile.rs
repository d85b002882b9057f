//! Driving the parser and generator over files and project directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use vortex_codegen::{Generator, validate};
use vortex_dart::{ParseErrorKind, WidgetTree, parse_str_with, scan_component_declarations};
use walkdir::WalkDir;

use crate::assets;
use crate::config::VortexConfig;

pub const APP_JS: &str = "app.js";
pub const MAIN_DART: &str = "main.dart";
pub const LIB_DIR: &str = "lib";

/// Settings shared by every document in one invocation.
#[derive(Debug, Clone)]
pub struct Compiler {
    pub config: VortexConfig,
    /// `--style-extension` on the command line.
    pub style_extension: bool,
}

impl Compiler {
    pub fn new(config: VortexConfig, style_extension: bool) -> Self {
        Self { config, style_extension }
    }

    pub fn parse(&self, src: &str, name: &str) -> Result<WidgetTree> {
        parse_str_with(src, self.config.parse_options()).with_context(|| format!("failed to parse {name}"))
    }

    /// One Dart document to JavaScript. `name` appears in messages and in
    /// the output banner.
    pub fn compile_source(&self, src: &str, name: &str) -> Result<String> {
        let tree = self.parse(src, name)?;
        self.generate(src, &tree, name)
    }

    fn generate(&self, src: &str, tree: &WidgetTree, name: &str) -> Result<String> {
        let declared = scan_component_declarations(src).into_iter().map(|d| d.name).collect();
        let options = self.config.generate_options(self.style_extension, declared);
        Generator::new(options)
            .with_source(name)
            .generate(tree)
            .with_context(|| format!("failed to generate JavaScript for {name}"))
    }

    /// Parse and validate without writing anything.
    pub fn check_file(&self, path: &Path) -> Result<()> {
        let src = read_source(path)?;
        let tree = self.parse(&src, &path.display().to_string())?;
        validate(&tree, self.config.compiler.max_depth)
            .with_context(|| format!("{} does not describe a valid widget tree", path.display()))
    }

    /// Compile a single `.dart` file into `out_dir/app.js` plus the static
    /// assets. Returns the files written.
    pub fn compile_file(&self, input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let src = read_source(input)?;
        let js = self.compile_source(&src, &display_name(input))?;
        create_dir(out_dir)?;
        let mut written = vec![write_output(&out_dir.join(APP_JS), &js)?];
        assets::write_assets(out_dir)?;
        written.extend(asset_paths(out_dir));
        Ok(written)
    }

    /// Compile a project directory: `main.dart` becomes `app.js` and every
    /// `lib/**/*.dart` becomes `lib/**/*.js`. Library files without a build
    /// method are skipped with a warning.
    pub fn compile_dir(&self, dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        create_dir(out_dir)?;

        let main = dir.join(MAIN_DART);
        if main.is_file() {
            let src = read_source(&main)?;
            let js = self.compile_source(&src, MAIN_DART)?;
            written.push(write_output(&out_dir.join(APP_JS), &js)?);
        } else {
            log::info!("no {MAIN_DART} in {}", dir.display());
        }

        let lib = dir.join(LIB_DIR);
        if lib.is_dir() {
            for entry in WalkDir::new(&lib).sort_by_file_name() {
                let entry = entry.with_context(|| format!("failed to walk {}", lib.display()))?;
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "dart") {
                    continue;
                }
                let rel = path.strip_prefix(dir).unwrap_or(path);
                if let Some(js) = self.compile_library_file(path, rel)? {
                    let target = out_dir.join(rel).with_extension("js");
                    if let Some(parent) = target.parent() {
                        create_dir(parent)?;
                    }
                    written.push(write_output(&target, &js)?);
                }
            }
        } else {
            log::warn!("no {LIB_DIR} directory in {}", dir.display());
        }

        if written.is_empty() {
            bail!("nothing to compile in {}: no {MAIN_DART} and no lib files with a build method", dir.display());
        }
        assets::write_assets(out_dir)?;
        written.extend(asset_paths(out_dir));
        Ok(written)
    }

    fn compile_library_file(&self, path: &Path, rel: &Path) -> Result<Option<String>> {
        let src = read_source(path)?;
        let name = rel.display().to_string();
        match parse_str_with(&src, self.config.parse_options()) {
            Ok(tree) => self.generate(&src, &tree, &name).map(Some),
            Err(e) if e.kind == ParseErrorKind::DeclarationNotFound => {
                log::warn!("skipping {name}: no build method");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("failed to parse {name}")),
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

fn write_output(path: &Path, contents: &str) -> Result<PathBuf> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("generated {}", path.display());
    Ok(path.to_path_buf())
}

fn asset_paths(out_dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    ["index.html", "styles.css"].into_iter().map(move |f| out_dir.join(f))
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
