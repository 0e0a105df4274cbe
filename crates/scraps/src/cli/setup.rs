use clap::{Parser, Subcommand, ValueEnum};
use scrapsapp::model::BackendKind;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Storage backend as named on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Global,
    Workspace,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Global => BackendKind::KeyValueStore,
            BackendArg::Workspace => BackendKind::WorkspaceFile,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "scraps",
    bin_name = "scraps",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Quick notes, kept globally or next to your workspace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this directory as the workspace root instead of detecting one
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_workspace", help_heading = "Options")]
    pub workspace: Option<PathBuf>,

    /// Run with global storage only
    #[arg(long, global = true, help_heading = "Options")]
    pub no_workspace: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List scraps
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only list one backend
        #[arg(long, value_enum)]
        from: Option<BackendArg>,
    },

    /// Create a scrap
    #[command(alias = "n", display_order = 2)]
    Add {
        /// Backend to store it in (default from configuration)
        #[arg(long, value_enum)]
        to: Option<BackendArg>,

        /// Label words, joined with spaces
        #[arg(trailing_var_arg = true)]
        label: Vec<String>,
    },

    /// Rename a scrap
    #[command(display_order = 3)]
    Rename {
        /// Index (g1, w2) or label of the scrap
        item: String,

        /// New label words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        label: Vec<String>,
    },

    /// Replace the content of a scrap (reads stdin when CONTENT is omitted)
    #[command(display_order = 4)]
    Edit {
        /// Index (g1, w2) or label of the scrap
        item: String,

        content: Option<String>,
    },

    /// Show scraps with their content
    #[command(alias = "v", display_order = 5)]
    View {
        /// Indexes, ranges (g1-g3) or label words
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Delete scraps
    #[command(alias = "rm", display_order = 6)]
    Delete {
        /// Indexes, ranges (g1-g3) or label words
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
    },

    /// Reload scraps from storage and list them
    #[command(display_order = 7)]
    Refresh,

    /// Import scraps from the legacy single-list format
    #[command(display_order = 8)]
    Migrate,

    /// Show which storage backends are available
    #[command(display_order = 9)]
    Backends,
}
