mod manifest;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostic::Diagnostics;
use cmdtree_core::Compiler;
use manifest::Manifest;
use report::Source;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Command tree compiler and linter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    action: Action,

    /// Also write logs to daily files in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Compile the declarations in a manifest and report every diagnostic.
    Check {
        /// Path to the TOML manifest.
        manifest: PathBuf,

        /// Path to the compiler configuration. Missing keys use their defaults.
        #[arg(long, default_value = "cmdtree.toml")]
        config: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,

        /// Write the compiled tree in Graphviz dot format.
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Write every missing configuration key with its default.
    Init {
        #[arg(long, default_value = "cmdtree.toml")]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Human,
    Json,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Setup logging
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("CMDTREE_LOG")
        .from_env_lossy();
    let writer = match &args.log_dir {
        Some(dir) => {
            let logfile = tracing_appender::rolling::daily(dir, "cmdtree.log");
            BoxMakeWriter::new(logfile.and(std::io::stderr))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(env_filter)
        .init();

    match args.action {
        Action::Check {
            manifest,
            config,
            format,
            dot,
        } => check(&manifest, &config, format, dot.as_deref()),
        Action::Init { config } => {
            let changed = CompilerConfig::write_defaults(&config)
                .with_context(|| format!("failed to write {}", config.display()))?;
            if changed {
                info!("Wrote defaults to {}", config.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(manifest_path: &Path, config_path: &Path, format: Format, dot: Option<&Path>) -> Result<ExitCode> {
    let config = CompilerConfig::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let text = fs::read_to_string(manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest = Manifest::parse(&text)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;
    let members = manifest.members()?;

    let compiler = Compiler::new(config.clone(), manifest.hierarchy(&config));
    let mut diagnostics = Diagnostics::new();
    let result = compiler.compile(&members, &mut diagnostics);

    match (&result, dot) {
        (Ok(env), Some(path)) => fs::write(path, env.tree.to_dot())
            .with_context(|| format!("failed to write {}", path.display()))?,
        (Err(err), Some(_)) => warn!("Not writing the dot graph: {}", err),
        (_, None) => {}
    }

    let source = Source::new(manifest_path, &text);
    let mut out = anstream::stdout();
    match format {
        Format::Human => {
            report::human(&mut out, &source, diagnostics.entries())?;
            match &result {
                Ok(env) => info!("Compiled {} node(s)", env.tree.node_count()),
                Err(err) => anstream::eprintln!("{}", err),
            }
        }
        Format::Json => report::json(&mut out, &source, diagnostics.entries())?,
    }

    Ok(match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}
