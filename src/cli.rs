use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "gitea-provision")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative management of Gitea user accounts", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Provider config file (default: <config dir>/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage Gitea user accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Print the schema of a resource type as JSON
    Schema {
        /// Resource type (all types when omitted)
        resource: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// User Commands
// ============================================================================

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create the declared users
    Create(UserArgs),

    /// Refresh tracked state of the declared users
    Read(UserArgs),

    /// Push the declared fields to existing users
    Update(UserArgs),

    /// Delete the declared users
    Delete(UserArgs),
}

#[derive(Args, Debug)]
pub struct UserArgs {
    /// Declaration file with one or more [[user]] tables
    #[arg(short, long)]
    pub file: String,

    /// Number of users processed in parallel
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
}
