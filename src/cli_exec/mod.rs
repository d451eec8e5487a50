use anyhow::{Context, Result};

use valentine::config::AppConfig;

use crate::Commands;

mod answer;
mod link;

pub(super) fn handle_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        // The runtime starts the terminal UI itself.
        Commands::Play(_) => anyhow::bail!("play runs the terminal UI"),
        Commands::Link(args) => link::handle_link_command(config, args)?,
        Commands::Inspect(args) => link::handle_inspect_command(args.url, args.json)?,
        Commands::Phrases(args) => answer::handle_phrases_command(args.upto, args.json)?,
        Commands::Share(args) => answer::handle_share_command(config, args)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {} json", what))?
    );
    Ok(())
}
