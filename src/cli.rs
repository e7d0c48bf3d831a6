use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "linkdir")]
#[command(bin_name = "linkdir")]
#[command(version)]
#[command(about = "A local-first personal link directory")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "LINKDIR_DB_PATH",
        global = true,
        help = "Path to the link store (SQLite). Overrides db_path from the config file."
    )]
    pub db: Option<String>,

    #[arg(
        long,
        env = "LINKDIR_CONFIG",
        global = true,
        help = "Config file (defaults to ~/.config/linkdir/config.toml)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug)."
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List links grouped by category, optionally filtered.")]
    Ls(ListArgs),
    #[command(about = "Add a link.")]
    Add(AddArgs),
    #[command(about = "Update a link; omitted fields keep their current value.")]
    Update(UpdateArgs),
    #[command(about = "Remove a link.")]
    Rm(RemoveArgs),
    #[command(about = "Show one link.")]
    Show(ShowArgs),
    #[command(about = "Open a link with the system url handler.")]
    Open(OpenArgs),
    #[command(about = "Manage categories.")]
    Category(CategoryArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(help = "Case-insensitive text to match against title or url.")]
    pub query: Option<String>,

    #[arg(long, help = "Emit the grouped view as JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(help = "Link title.")]
    pub title: String,

    #[arg(help = "Link url; https:// is added when no scheme is given.")]
    pub url: String,

    #[arg(short = 'c', long, help = "Category id or exact name.")]
    pub category: Option<String>,

    #[arg(short = 's', long, help = "Pin the link first within its category.")]
    pub special: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(help = "Link id.")]
    pub id: String,

    #[arg(short = 't', long, help = "Set title.")]
    pub title: Option<String>,

    #[arg(short = 'u', long, help = "Set url.")]
    pub url: Option<String>,

    #[arg(
        short = 'c',
        long,
        conflicts_with = "uncategorized",
        help = "Move to a category (id or exact name)."
    )]
    pub category: Option<String>,

    #[arg(long, help = "Move to no category.")]
    pub uncategorized: bool,

    #[arg(long, conflicts_with = "no_special", help = "Pin the link.")]
    pub special: bool,

    #[arg(long = "no-special", help = "Unpin the link.")]
    pub no_special: bool,
}

impl UpdateArgs {
    pub fn special_flag(&self) -> Option<bool> {
        if self.special {
            Some(true)
        } else if self.no_special {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(help = "Link id.")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Link id.")]
    pub id: String,

    #[arg(long, help = "Emit JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    #[arg(help = "Link id.")]
    pub id: String,

    #[arg(short = 'p', long, help = "Print the url instead of launching a handler.")]
    pub print: bool,
}

#[derive(Debug, Args)]
#[command(
    about = "Category commands.",
    long_about = "List, add, rename, or remove categories."
)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategorySubcommands,
}

#[derive(Debug, Subcommand)]
pub enum CategorySubcommands {
    #[command(about = "List categories with link counts.")]
    Ls(CategoryListArgs),
    #[command(about = "Add a category.")]
    Add(CategoryAddArgs),
    #[command(about = "Rename a category.")]
    Rename(CategoryRenameArgs),
    #[command(about = "Remove a category; its links become uncategorized.")]
    Rm(CategoryRemoveArgs),
}

#[derive(Debug, Args)]
pub struct CategoryListArgs {
    #[arg(long, help = "Emit JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CategoryAddArgs {
    #[arg(help = "Category name.")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CategoryRenameArgs {
    #[arg(help = "Category id or exact name.")]
    pub category: String,

    #[arg(help = "New name.")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CategoryRemoveArgs {
    #[arg(help = "Category id or exact name.")]
    pub category: String,

    #[arg(short = 'y', long, help = "Skip the confirmation prompt.")]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish, elvish, powershell). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}
