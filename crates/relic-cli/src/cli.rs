use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "relic",
    about = "Relic -- a minimal local version-control system",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new relic repository
    Init(InitArgs),
    /// Stage a file for the next commit
    Add(AddArgs),
    /// Unstage a file, or stage a tracked file for removal
    Rm(RmArgs),
    /// Commit the staged changes
    Commit(CommitArgs),
    /// Show the first-parent history of the current branch
    Log(LogArgs),
    /// Show every commit ever made
    GlobalLog(GlobalLogArgs),
    /// Print the ids of all commits with the given message
    Find(FindArgs),
    /// Show branches, staged changes, and the working-tree state
    Status(StatusArgs),
    /// Switch to another branch
    Checkout(CheckoutArgs),
    /// Restore a file from the current commit or a given one
    Restore(RestoreArgs),
    /// List branches or create one at the current commit
    Branch(BranchArgs),
    /// Move the current branch to a commit and restore its tree
    Reset(ResetArgs),
    /// Merge a branch into the current branch
    Merge(MergeArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    /// File to stage
    pub path: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// File to remove
    pub path: String,
}

#[derive(Args)]
pub struct CommitArgs {
    /// The commit message
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {}

#[derive(Args)]
pub struct GlobalLogArgs {}

#[derive(Args)]
pub struct FindArgs {
    /// The exact commit message to look for
    pub message: String,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct CheckoutArgs {
    /// The branch to switch to
    pub branch: String,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// The file to restore
    pub path: String,
    /// Restore from this commit instead of the current one
    #[arg(short, long)]
    pub commit: Option<String>,
}

#[derive(Args)]
pub struct BranchArgs {
    /// Name of the branch to create (omit to list branches)
    pub name: Option<String>,
    /// Delete the named branch instead of creating it
    #[arg(short = 'd', long)]
    pub delete: bool,
}

#[derive(Args)]
pub struct ResetArgs {
    /// The commit id to reset to
    pub commit: String,
}

#[derive(Args)]
pub struct MergeArgs {
    /// The branch to merge into the current one
    pub branch: String,
}
