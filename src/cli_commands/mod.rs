use clap::Subcommand;

pub(crate) mod answer;
pub(crate) mod link;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Walk through the flow in the terminal (the default)
    Play(answer::PlayArgs),

    /// Create a share link
    Link(link::LinkArgs),

    /// Show what a page URL decodes to and which screen it opens
    Inspect(link::InspectArgs),

    /// Show the "No" labels and "Yes" sizes per decline count
    Phrases(answer::PhrasesArgs),

    /// Accept a proposal link and build the reply message
    Share(answer::ShareArgs),
}
