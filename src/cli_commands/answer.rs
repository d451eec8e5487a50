use clap::Args;

#[derive(Args)]
pub(crate) struct PlayArgs {
    /// Link to open (defaults to the creator form)
    pub(crate) url: Option<String>,
}

#[derive(Args)]
pub(crate) struct PhrasesArgs {
    /// Show decline counts 0..=N
    #[arg(long, default_value_t = 12)]
    pub(crate) upto: u64,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ShareArgs {
    /// The proposal link you received
    #[arg(long)]
    pub(crate) link: String,
    /// Your name (required unless the link already carries it)
    #[arg(long)]
    pub(crate) recipient: Option<String>,
    /// Open the message draft in the default handler
    #[arg(long)]
    pub(crate) open: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
