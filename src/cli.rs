use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::commands::CommandReport;
use crate::commands::push::PushOptions;

#[derive(Debug, Parser)]
#[command(
    name = "collsync",
    version,
    about = "Inspect and synchronize tagged media-source collections"
)]
pub struct Cli {
    /// Emit the full report as JSON instead of text lines.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the complete membership of one or more collections.
    Members {
        #[arg(required = true)]
        collection_ids: Vec<u64>,
    },
    /// Show a collection's metadata, tag set, and full membership.
    Details { collection_id: u64 },
    /// List the public collections in a tag set.
    Sets { tag_set_id: u64 },
    /// Search media sources by keyword (`*` lists without a name filter).
    Search {
        keyword: String,
        /// Restrict matches to members of this collection.
        #[arg(long)]
        collection: Option<u64>,
    },
    /// Per-source sentence counts over a random sample.
    SentenceStats { collection_id: u64 },
    /// Preview the add/remove operations that would converge a collection.
    Diff {
        collection_id: u64,
        /// Comma-separated member ids the collection should contain.
        #[arg(long)]
        sources: String,
    },
    /// Create or update a collection and synchronize its membership.
    Push(PushArgs),
    /// Report resolved configuration and environment problems.
    Status,
}

#[derive(Debug, Args)]
pub struct PushArgs {
    /// Collection to update; omit together with --create.
    pub collection_id: Option<u64>,

    /// Comma-separated member ids the collection should contain.
    #[arg(long)]
    pub sources: String,

    /// Collection name (also used as its label).
    #[arg(long)]
    pub name: String,

    /// Collection description.
    #[arg(long)]
    pub description: String,

    /// Create a new collection instead of updating one.
    #[arg(long)]
    pub create: bool,

    /// Tag set to create the collection in (required with --create).
    #[arg(long)]
    pub tag_set: Option<u64>,

    /// Mark the collection static (membership frozen upstream).
    #[arg(long)]
    pub static_collection: bool,

    #[arg(long)]
    pub show_on_stories: bool,

    #[arg(long)]
    pub show_on_media: bool,
}

impl From<&PushArgs> for PushOptions {
    fn from(args: &PushArgs) -> Self {
        PushOptions {
            collection_id: args.collection_id,
            create: args.create,
            tag_set: args.tag_set,
            sources: args.sources.clone(),
            name: args.name.clone(),
            description: args.description.clone(),
            is_static: args.static_collection,
            show_on_stories: args.show_on_stories,
            show_on_media: args.show_on_media,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match &cli.command {
        Command::Members { collection_ids } => commands::members::run(collection_ids)?,
        Command::Details { collection_id } => commands::details::run(*collection_id)?,
        Command::Sets { tag_set_id } => commands::sets::run(*tag_set_id)?,
        Command::Search {
            keyword,
            collection,
        } => commands::search::run(keyword, *collection)?,
        Command::SentenceStats { collection_id } => {
            commands::sentence_stats::run(*collection_id)?
        }
        Command::Diff {
            collection_id,
            sources,
        } => commands::diff::run(*collection_id, sources)?,
        Command::Push(args) => commands::push::run(&PushOptions::from(args))?,
        Command::Status => commands::status::run()?,
    };

    render(&report, cli.json)
}

fn render(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in &report.details {
            println!("{line}");
        }
        for issue in &report.issues {
            eprintln!("issue: {issue}");
        }
    }

    if report.ok {
        Ok(())
    } else {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len())
    }
}
