//! # CLI Layer
//!
//! The **only** place that knows about terminal I/O, exit codes and argument parsing.
//!
//! 1. **Argument Parsing**: shell arguments to typed commands via clap
//! 2. **Logging**: install the `tracing` subscriber
//! 3. **Context Setup**: detect the workspace, load configuration, build the API
//! 4. **Dispatch**: one API call per command
//! 5. **Output**: render the `CmdResult` as text or JSON

use super::print::{print_result, Render};
use super::setup::{Cli, Commands, OutputFormat};
use clap::Parser;
use scrapsapp::api::ScrapsApi;
use scrapsapp::commands::CmdResult;
use scrapsapp::error::{Result, ScrapsError};
use scrapsapp::init::initialize;
use scrapsapp::kv::json_file::JsonFileKv;
use std::io::{IsTerminal, Read};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().map_err(ScrapsError::Io)?;
    let ctx = initialize(&cwd, cli.workspace.clone(), cli.no_workspace)?;
    debug!(workspace = ?ctx.workspace_root, "context ready");

    let mut api = ctx.api;
    let (result, render) = dispatch(&mut api, cli.command)?;
    print_result(&result, render, cli.output == OutputFormat::Json)
}

fn dispatch(
    api: &mut ScrapsApi<JsonFileKv>,
    command: Option<Commands>,
) -> Result<(CmdResult, Render)> {
    let command = command.unwrap_or(Commands::List { from: None });
    let outcome = match command {
        Commands::List { from } => (api.list(from.map(Into::into))?, Render::List),
        Commands::Add { to, label } => {
            let label = join_words(&label);
            let result = match to {
                Some(kind) => api.add_item_to_backend(kind.into(), label)?,
                None => api.add_item(label)?,
            };
            (result, Render::Messages)
        }
        Commands::Rename { item, label } => {
            let label = join_words(&label).unwrap_or_default();
            (api.rename_item(&item, label)?, Render::Messages)
        }
        Commands::Edit { item, content } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            (api.edit_item(&item, content)?, Render::Messages)
        }
        Commands::View { items } => (api.view_items(items.as_slice())?, Render::Full),
        Commands::Delete { items } => (api.delete_item(items.as_slice())?, Render::Messages),
        Commands::Refresh => (api.refresh()?, Render::List),
        Commands::Migrate => (api.migrate_legacy_data()?, Render::Messages),
        Commands::Backends => (api.available_backends()?, Render::Backends),
    };
    Ok(outcome)
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Joins label words; no words means "use the default label".
fn join_words(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(ScrapsError::Api(
            "No content given: pass it as an argument or pipe it on stdin".to_string(),
        ));
    }
    let mut content = String::new();
    stdin.read_to_string(&mut content)?;
    Ok(content)
}
