mod common;
mod error;
mod run;
mod software;
mod ui;
mod update;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;

use crate::common::distro::Arch;
use crate::common::http::ReqwestClient;
use crate::common::paths::Paths;
use crate::common::shell::SystemShell;
use crate::run::{Environment, LocalHost, Orchestrator, PromptSelector};
use crate::software::Registry;
use crate::ui::prelude::*;
use crate::ui::OutputFormat;

/// Bring a workstation up to date and install common desktop applications
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show every command and state transition
    #[arg(short, long)]
    debug: bool,

    /// Output format for messages
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
}

fn provision() -> Result<()> {
    let registry = Registry::builtin().context("building the application registry")?;
    let shell = SystemShell;
    let http = ReqwestClient::new().context("creating the HTTP client")?;
    let paths = Paths::from_env().context("resolving the home directory")?;

    let env = Environment {
        shell: &shell,
        http: &http,
        paths: &paths,
        arch: Arch::current(),
    };
    let summary = Orchestrator::new(env, &registry).run(&LocalHost, &mut PromptSelector)?;

    emit(
        Level::Success,
        "run.done",
        &format!(
            "{} Provisioning complete ({} installed, {} skipped)",
            char::from(NerdFont::Check),
            summary.installed.len(),
            summary.skipped.len()
        ),
        Some(serde_json::json!({
            "installed": summary.installed,
            "skipped": summary.skipped,
        })),
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.output, std::io::stdout().is_terminal());
    ui::set_debug_mode(cli.debug);

    if let Err(e) = provision() {
        match ui::get_output_format() {
            OutputFormat::Json => emit(Level::Error, "run.failed", &format!("{e:#}"), None),
            OutputFormat::Text => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}
