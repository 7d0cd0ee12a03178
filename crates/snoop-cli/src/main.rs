//! # snoop CLI
//!
//! Command-line front end for the snooplib preload layer.
//!
//! ## Commands
//!
//! - `snoop run [-o FILE] -- <cmd>...` - Run a command with the layer preloaded
//! - `snoop tree <FILE>` - Show a dump as an indented tree
//! - `snoop config` - Print the effective configuration

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snoop_config::{log_cli_debug, log_cli_info, logging, Config, LogLevel};
use snoop_trie::write_tree;

mod library;
mod tree;

/// snooplib - record the files a process opens
#[derive(Parser)]
#[command(name = "snoop")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CLI log level (the layer has its own, see `run --layer-log`)
    #[arg(long, global = true, env = "SNOOP_CLI_LOG", default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command with the layer preloaded
    Run {
        /// Write the dump here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Append to the dump file instead of truncating it
        #[arg(long)]
        append: bool,

        /// Layer library to preload
        #[arg(long, env = "SNOOPLIB_LIBRARY", value_name = "PATH")]
        library: Option<PathBuf>,

        /// Log level for the layer inside the child
        #[arg(long, value_name = "LEVEL")]
        layer_log: Option<LogLevel>,

        /// Command to execute
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            required = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },

    /// Show a dump file as an indented tree
    Tree {
        /// Dump file, plain or with begin/end markers
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    match cli.command {
        Commands::Run {
            output,
            append,
            library,
            layer_log,
            command,
        } => cmd_run(
            output.as_deref(),
            append,
            library.as_deref(),
            layer_log,
            &command,
        ),
        Commands::Tree { file } => cmd_tree(&file),
        Commands::Config => cmd_config(),
    }
}

/// Execute a command with the layer preloaded
fn cmd_run(
    output: Option<&Path>,
    append: bool,
    explicit_library: Option<&Path>,
    layer_log: Option<LogLevel>,
    command: &[String],
) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        anyhow::bail!("No command specified");
    };

    let library = library::find_layer_library(explicit_library)?;
    let library = library
        .canonicalize()
        .with_context(|| format!("Failed to resolve library path: {}", library.display()))?;

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(output) = output {
        // The child may change directory before it exits.
        config.output.path = Some(absolute(output)?);
    }
    if append {
        config.output.append = Some(true);
    }
    if layer_log.is_some() {
        config.log.level = layer_log;
    }

    log_cli_info!(
        "Launching command",
        program = program.as_str(),
        library = tracing::field::display(library.display())
    );

    let mut cmd = std::process::Command::new(program);
    cmd.args(args);
    cmd.envs(config.layer_env());
    cmd.env(
        library::PRELOAD_VAR,
        library::preload_value(
            &library,
            std::env::var_os(library::PRELOAD_VAR).as_deref(),
        ),
    );

    let status = cmd
        .status()
        .with_context(|| format!("Failed to execute: {}", program))?;
    log_cli_debug!("Command finished", status = tracing::field::display(status));

    std::process::exit(exit_code(status));
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Shell convention: 128 + signal for a child killed by a signal.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(1)
}

/// Print a dump as an indented tree
fn cmd_tree(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let trie = tree::parse_dump(&bytes)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let leaves = write_tree(&trie, &mut out)?;
    out.flush()?;

    eprintln!("{} paths, {} nodes", leaves, trie.len());
    Ok(())
}

/// Print the merged configuration
fn cmd_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let toml = config.to_toml().context("Failed to render configuration")?;
    print!("{}", toml);
    if let Some(global) = Config::global_config_path() {
        eprintln!("Global:  {}", global.display());
    }
    eprintln!("Project: .snooplib/config.toml");
    Ok(())
}
