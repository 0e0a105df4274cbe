//! # CLI Behavior
//!
//! This is **one possible UI client** for scraps, not the application itself.
//!
//! ## Naked Execution
//!
//! Running `scraps` with no arguments is `scraps list`.
//!
//! ## Addressing Scraps
//!
//! Listings print a short index per scrap: `g1`, `g2`, ... for global scraps and `w1`, ... for
//! workspace scraps. Every command taking an item accepts an index, a range (`g1-g3`), or words
//! of the label, which must match exactly one scrap.
//!
//! ## Workspace
//!
//! The workspace is found by walking up from the current directory to the first `.scraps` or
//! `.git`. `--workspace <PATH>` forces one, `--no-workspace` runs with global storage only.
//!
//! ## Output
//!
//! `--output json` prints one JSON document per invocation instead of styled text. Logs go to
//! stderr, filtered by `RUST_LOG` or `-v` / `-vv` / `-vvv`.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: logging, context initialization and dispatch
//! - `print`: text and JSON rendering of `CmdResult`s

mod commands;
mod print;
pub mod setup;

pub use commands::run;
