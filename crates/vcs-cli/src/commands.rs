use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;
use tracing::debug;
use vcs_refs::{RefKind, RemoteNames};
use vcs_sqlmap::{CopyMap, Database, DirstateEntry, DirstateMap, MapConfig};
use vcs_sync::{load_remote_names, MetadataDir};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");
    let format = cli.format;
    match cli.command {
        Command::Remotenames(args) => cmd_remotenames(args, &config, format),
        Command::Dirstate(args) => cmd_dirstate(args, &config.sqlmap, format),
        Command::Copies(args) => cmd_copies(args, &config.sqlmap, format),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Drop the kind the user did not ask for.
fn restrict(mut names: RemoteNames, kind: Option<RefKind>) -> RemoteNames {
    for refs in names.values_mut() {
        match kind {
            Some(RefKind::Branches) => refs.bookmarks.clear(),
            Some(RefKind::Bookmarks) => refs.branches.clear(),
            None => {}
        }
    }
    names.retain(|_, refs| !refs.branches.is_empty() || !refs.bookmarks.is_empty());
    names
}

fn cmd_remotenames(
    args: RemotenamesArgs,
    config: &CliConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let meta = MetadataDir::new(&args.repo);
    let names = restrict(load_remote_names(&meta, &config.remotenames)?, args.kind);

    if format == OutputFormat::Json {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("No remote names recorded.");
        return Ok(());
    }
    for (remote, refs) in &names {
        println!("{}", remote.bold());
        for (branch, heads) in &refs.branches {
            for head in heads {
                println!("  {} {} {}", "branch  ".green(), head.short_hex().dimmed(), branch);
            }
        }
        for (bookmark, node) in &refs.bookmarks {
            if let Some(node) = node {
                println!("  {} {} {}", "bookmark".yellow(), node.short_hex().dimmed(), bookmark);
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DirstateRow<'a> {
    path: &'a str,
    #[serde(flatten)]
    entry: &'a DirstateEntry,
}

fn print_entry(path: &str, entry: &DirstateEntry, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&DirstateRow { path, entry }),
        OutputFormat::Text => {
            println!(
                "{} {:>6o} {:>10} {:>12} {}",
                entry.state.to_string().cyan(),
                entry.mode,
                entry.size,
                entry.mtime,
                path
            );
            Ok(())
        }
    }
}

fn cmd_dirstate(args: DirstateArgs, config: &MapConfig, format: OutputFormat) -> anyhow::Result<()> {
    let map = DirstateMap::with_config(Database::open(&args.db)?, config)?;
    match args.action {
        DirstateAction::List { pending } => {
            if pending {
                let paths = map.non_normal()?;
                return match format {
                    OutputFormat::Json => print_json(&paths),
                    OutputFormat::Text => {
                        paths.iter().for_each(|p| println!("{p}"));
                        Ok(())
                    }
                };
            }
            if format == OutputFormat::Json {
                return print_json(&map.copy()?);
            }
            for item in map.items() {
                let (path, entry) = item?;
                print_entry(&path, &entry, format)?;
            }
            Ok(())
        }
        DirstateAction::Get { path } => {
            let entry = map.get(path.as_str())?;
            print_entry(&path, &entry, format)
        }
        DirstateAction::Rm { path } => {
            map.delete(path.as_str())?;
            println!("{} forgot {}", "✓".green(), path.bold());
            Ok(())
        }
        DirstateAction::Clear => {
            let count = map.len()?;
            map.clear()?;
            println!("{} cleared {} entries", "✓".green(), count);
            Ok(())
        }
    }
}

fn cmd_copies(args: CopiesArgs, config: &MapConfig, format: OutputFormat) -> anyhow::Result<()> {
    let map = CopyMap::with_config(Database::open(&args.db)?, config)?;
    match args.action {
        CopiesAction::List => {
            if format == OutputFormat::Json {
                let copies: BTreeMap<String, String> = map.copy()?;
                return print_json(&copies);
            }
            for item in map.items() {
                let (dest, source) = item?;
                println!("{} {} {}", dest, "<-".dimmed(), source);
            }
            Ok(())
        }
        CopiesAction::Set { dest, source } => {
            map.set(dest.as_str(), &source)?;
            println!("{} {} copied from {}", "✓".green(), dest.bold(), source);
            Ok(())
        }
        CopiesAction::Rm { dest } => {
            map.delete(dest.as_str())?;
            println!("{} forgot copy record for {}", "✓".green(), dest.bold());
            Ok(())
        }
    }
}
