//! `vortex`: compile Flutter `build` methods into browser JavaScript.

mod assets;
mod compile;
mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use compile::Compiler;
use config::VortexConfig;
use logging::{LoggingConfig, init_logging};

#[derive(Parser, Debug)]
#[command(name = "vortex", version, about, long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log filter in `env_logger` syntax; overrides RUST_LOG.
    #[arg(long, value_name = "FILTER", global = true)]
    log: Option<String>,

    /// Use this config file instead of searching for vortex.toml.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a .dart file or a project directory.
    Build(BuildArgs),

    /// Print the parsed widget tree of a file as JSON.
    Tree(TreeArgs),

    /// Parse and validate files without writing output.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// A .dart file, or a directory with main.dart and/or lib/.
    input: PathBuf,

    /// Output directory (default: compiler.output_dir from vortex.toml, else dist).
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Load the extension stylesheet.
    #[arg(long)]
    style_extension: bool,
}

#[derive(Args, Debug)]
struct TreeArgs {
    file: PathBuf,

    /// Indent the JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_flags(cli.log.clone(), cli.verbose, cli.quiet));

    match &cli.command {
        Commands::Build(args) => build(&cli, args),
        Commands::Tree(args) => tree(&cli, args),
        Commands::Check(args) => check(&cli, args),
    }
}

fn load_config(cli: &Cli, input: &Path) -> Result<VortexConfig> {
    match &cli.config {
        Some(path) => VortexConfig::load(path),
        None => {
            let dir = if input.is_dir() { input } else { input.parent().unwrap_or(Path::new(".")) };
            VortexConfig::discover(dir)
        }
    }
}

fn build(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let config = load_config(cli, &args.input)?;
    let out_dir = config.resolve_output_dir(args.output.as_deref());
    let compiler = Compiler::new(config, args.style_extension);

    let written = if args.input.is_dir() {
        compiler.compile_dir(&args.input, &out_dir)?
    } else {
        compiler.compile_file(&args.input, &out_dir)?
    };
    log::debug!("{} file(s) written", written.len());
    println!("compiled to {}", out_dir.display());
    Ok(())
}

fn tree(cli: &Cli, args: &TreeArgs) -> Result<()> {
    let config = load_config(cli, &args.file)?;
    let src = fs::read_to_string(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let tree = Compiler::new(config, false).parse(&src, &args.file.display().to_string())?;
    let json = if args.pretty { serde_json::to_string_pretty(&tree) } else { serde_json::to_string(&tree) };
    let json = json.context("failed to serialize widget tree")?;
    println!("{json}");
    Ok(())
}

fn check(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let mut failed = 0usize;
    for file in &args.files {
        let config = load_config(cli, file)?;
        match Compiler::new(config, false).check_file(file) {
            Ok(()) => println!("ok       {}", file.display()),
            Err(e) => {
                failed += 1;
                log::error!("{e:#}");
                println!("failed   {}", file.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) failed", args.files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_flags() {
        let cli = Cli::try_parse_from(["vortex", "-v", "build", "app", "-o", "out", "--style-extension"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Build(args) = cli.command else { panic!("expected build") };
        assert_eq!(args.input, PathBuf::from("app"));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.style_extension);
    }

    #[test]
    fn check_needs_a_file() {
        assert!(Cli::try_parse_from(["vortex", "check"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vortex", "tree", "main.dart", "--pretty", "-q", "--log", "debug"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log.as_deref(), Some("debug"));
    }
}
