//! # Scraps CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only invokes
//! `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/scraps/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - logging, context wiring, dispatch (commands.rs)          │
//! │  - terminal and JSON output (print.rs)                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  scrapsapp (crates/scrapsapp/)                              │
//! │  - ScrapsApi facade, commands, catalog, storage             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic. Parsing, rendering, exit codes and the
//! logging subscriber belong here.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
