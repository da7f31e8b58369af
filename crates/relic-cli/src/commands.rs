use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use colored::Colorize;
use relic_repo::{LogEntry, MergeReport, ModificationKind, Repository};
use relic_types::{ObjectId, Timestamp};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    match cli.command {
        Command::Init(_) => cmd_init(&workdir),
        Command::Add(args) => cmd_add(&workdir, args),
        Command::Rm(args) => cmd_rm(&workdir, args),
        Command::Commit(args) => cmd_commit(&workdir, args),
        Command::Log(_) => cmd_log(&workdir),
        Command::GlobalLog(_) => cmd_global_log(&workdir),
        Command::Find(args) => cmd_find(&workdir, args),
        Command::Status(_) => cmd_status(&workdir),
        Command::Checkout(args) => cmd_checkout(&workdir, args),
        Command::Restore(args) => cmd_restore(&workdir, args),
        Command::Branch(args) => cmd_branch(&workdir, args),
        Command::Reset(args) => cmd_reset(&workdir, args),
        Command::Merge(args) => cmd_merge(&workdir, args),
    }
}

fn cmd_init(workdir: &PathBuf) -> anyhow::Result<()> {
    Repository::init(workdir)?;
    println!(
        "{} Initialized empty relic repository in {}",
        "✓".green().bold(),
        workdir.join(relic_repo::META_DIR_NAME).display()
    );
    Ok(())
}

fn cmd_add(workdir: &PathBuf, args: AddArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    repo.add(&args.path)?;
    println!("  {} {}", "staged:".green(), args.path);
    Ok(())
}

fn cmd_rm(workdir: &PathBuf, args: RmArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    repo.remove(&args.path)?;
    println!("  {} {}", "removed:".red(), args.path);
    Ok(())
}

fn cmd_commit(workdir: &PathBuf, args: CommitArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    let commit_id = repo.commit(&args.message)?;
    println!(
        "{} [{}] {}",
        "✓".green().bold(),
        commit_id.short_hex().yellow(),
        args.message
    );
    Ok(())
}

fn cmd_log(workdir: &PathBuf) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    for entry in repo.log()? {
        print_log_entry(&entry);
    }
    Ok(())
}

fn cmd_global_log(workdir: &PathBuf) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    for entry in repo.global_log()? {
        print_log_entry(&entry);
    }
    Ok(())
}

fn cmd_find(workdir: &PathBuf, args: FindArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    for id in repo.find(&args.message)? {
        println!("{id}");
    }
    Ok(())
}

fn cmd_status(workdir: &PathBuf) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    let status = repo.status()?;

    println!("{}", "=== Branches ===".bold());
    for name in &status.branches {
        if *name == status.current_branch {
            println!("* {}", name.green());
        } else {
            println!("  {name}");
        }
    }

    println!("\n{}", "=== Staged Files ===".bold());
    for path in &status.staged {
        println!("  {}", path.green());
    }

    println!("\n{}", "=== Removed Files ===".bold());
    for path in &status.removed {
        println!("  {}", path.red());
    }

    println!("\n{}", "=== Modifications Not Staged For Commit ===".bold());
    for m in &status.modifications {
        let tag = match m.kind {
            ModificationKind::Modified => "(modified)",
            ModificationKind::Deleted => "(deleted)",
        };
        println!("  {} {}", m.path.yellow(), tag.dimmed());
    }

    println!("\n{}", "=== Untracked Files ===".bold());
    for path in &status.untracked {
        println!("  {path}");
    }

    Ok(())
}

fn cmd_checkout(workdir: &PathBuf, args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    repo.checkout_branch(&args.branch)?;
    println!("Switched to branch {}", args.branch.yellow().bold());
    Ok(())
}

fn cmd_restore(workdir: &PathBuf, args: RestoreArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    match args.commit {
        Some(hex) => {
            let id = parse_commit_id(&hex)?;
            repo.checkout_path_at(id, &args.path)?;
        }
        None => repo.checkout_path(&args.path)?,
    }
    println!("  {} {}", "restored:".green(), args.path);
    Ok(())
}

fn cmd_branch(workdir: &PathBuf, args: BranchArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    match (args.name, args.delete) {
        (Some(name), true) => {
            repo.remove_branch(&name)?;
            println!("Deleted branch {}", name.yellow());
        }
        (Some(name), false) => {
            repo.branch(&name)?;
            println!("Created branch {}", name.yellow());
        }
        (None, true) => bail!("branch name required with -d"),
        (None, false) => {
            let status = repo.status()?;
            for name in &status.branches {
                if *name == status.current_branch {
                    println!("* {}", name.green().bold());
                } else {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_reset(workdir: &PathBuf, args: ResetArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    let id = parse_commit_id(&args.commit)?;
    repo.reset(id)?;
    println!("Reset {} to {}", "HEAD".bold(), id.short_hex().yellow());
    Ok(())
}

fn cmd_merge(workdir: &PathBuf, args: MergeArgs) -> anyhow::Result<()> {
    let repo = Repository::open(workdir)?;
    match repo.merge(&args.branch)? {
        MergeReport::AlreadyMerged => {
            println!("Given branch is an ancestor of the current branch.");
        }
        MergeReport::FastForward { target } => {
            println!(
                "Current branch fast-forwarded to {}.",
                target.short_hex().yellow()
            );
        }
        MergeReport::Merged { commit, conflicts } => {
            // A conflicted merge still completes: the commit exists and the
            // conflict is reported as a flag, not a failure.
            if !conflicts.is_empty() {
                println!("{}", "Encountered a merge conflict.".red().bold());
                for path in &conflicts {
                    println!("  {} {}", "conflict:".red(), path);
                }
            }
            println!(
                "{} Merged {} into the current branch: [{}]",
                "✓".green().bold(),
                args.branch.yellow(),
                commit.short_hex().yellow()
            );
        }
    }
    Ok(())
}

fn print_log_entry(entry: &LogEntry) {
    println!("{}", "===".dimmed());
    println!("{} {}", "commit".yellow(), entry.id);
    if entry.is_merge() {
        println!(
            "Merge: {} {}",
            &entry.parents[0].to_hex()[..7],
            &entry.parents[1].to_hex()[..7]
        );
    }
    println!("Date: {}", format_timestamp(entry.timestamp));
    println!("{}\n", entry.message);
}

fn format_timestamp(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts.ms as i64)
        .map(|dt| dt.format("%a %b %e %H:%M:%S %Y %z").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_commit_id(hex: &str) -> anyhow::Result<ObjectId> {
    ObjectId::from_hex(hex).with_context(|| format!("invalid commit id: {hex}"))
}
