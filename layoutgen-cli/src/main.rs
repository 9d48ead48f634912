use anyhow::{bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use layoutgen_core::generate::{
    GenerateConfig, Generator, DEFAULT_BASE_MANIFEST, DEFAULT_PACKAGE, DEFAULT_ROOT,
};
use layoutgen_core::localize::FluentLoc;
use layoutgen_core::verify;
use layoutgen_core::walk::WalkOptions;

/// Running with no subcommand generates with the default paths.
#[derive(Parser)]
#[command(name = "layoutgen", version, about = "Generate layout.json and manifest.json for an MSFS package")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Cmd {
    /// Write layout.json and manifest.json into the package root
    Generate(GenerateArgs),
    /// Compare an existing layout.json against the package root
    Check(CheckArgs),
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, default_value = "en-GB")]
    lang: String,
}

#[derive(Args, Clone)]
struct WalkArgs {
    /// Glob of relative paths to leave out (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
    /// Visit entries in file-name order instead of filesystem order
    #[arg(long, default_value_t = false)]
    sort: bool,
    #[arg(long, default_value_t = false)]
    follow_symlinks: bool,
}

impl From<WalkArgs> for WalkOptions {
    fn from(a: WalkArgs) -> Self {
        WalkOptions { exclude: a.exclude, sort: a.sort, follow_symlinks: a.follow_symlinks }
    }
}

#[derive(Args, Clone)]
struct GenerateArgs {
    #[arg(long, default_value = DEFAULT_ROOT)]
    root: PathBuf,
    #[arg(long, default_value = DEFAULT_BASE_MANIFEST)]
    base_manifest: PathBuf,
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: PathBuf,
    #[command(flatten)]
    walk: WalkArgs,
    /// Compute both documents but write nothing
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, default_value_t = false)]
    progress: bool,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Clone)]
struct CheckArgs {
    #[arg(long, default_value = DEFAULT_ROOT)]
    root: PathBuf,
    #[command(flatten)]
    walk: WalkArgs,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Cmd::Generate(cli.generate)) {
        Cmd::Generate(args) => generate(args),
        Cmd::Check(args) => check(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn generate(args: GenerateArgs) -> Result<()> {
    init_tracing(args.common.verbose);
    let loc = FluentLoc::builtin(&args.common.lang);
    let cfg = GenerateConfig {
        root: args.root,
        base_manifest: args.base_manifest,
        package: args.package,
        walk: args.walk.into(),
        dry_run: args.dry_run,
        progress: args.progress,
    };
    let rep = Generator::generate(&cfg)?;
    let files = rep.files.to_string();
    let size = rep.total_size.to_string();
    if rep.written {
        let layout = rep.layout_path.display().to_string();
        let manifest = rep.manifest_path.display().to_string();
        println!(
            "{}",
            loc.msg(
                "generate-summary",
                &[("files", files.as_str()), ("size", size.as_str()), ("layout", layout.as_str()), ("manifest", manifest.as_str())]
            )
        );
    } else {
        println!("{}", loc.msg("generate-dry-run", &[("files", files.as_str()), ("size", size.as_str())]));
    }
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    init_tracing(args.common.verbose);
    let loc = FluentLoc::builtin(&args.common.lang);
    let root_s = args.root.display().to_string();
    let rep = verify::check(&args.root, &args.walk.into())?;
    if rep.is_clean() {
        let files = rep.checked.to_string();
        let size = rep.recorded_size.to_string();
        println!(
            "{}",
            loc.msg(
                "check-clean",
                &[("files", files.as_str()), ("size", size.as_str()), ("root", root_s.as_str())]
            )
        );
        return Ok(());
    }
    for p in &rep.missing {
        println!("{}", loc.msg("check-missing", &[("path", p.as_str())]));
    }
    for p in &rep.extra {
        println!("{}", loc.msg("check-extra", &[("path", p.as_str())]));
    }
    for c in &rep.changed {
        let what = c.kind.to_string();
        println!("{}", loc.msg("check-changed", &[("path", c.path.as_str()), ("what", what.as_str())]));
    }
    let missing = rep.missing.len().to_string();
    let extra = rep.extra.len().to_string();
    let changed = rep.changed.len().to_string();
    bail!(
        "{}",
        loc.msg(
            "check-drift",
            &[("root", root_s.as_str()), ("missing", missing.as_str()), ("extra", extra.as_str()), ("changed", changed.as_str())]
        )
    )
}
