use clap::Args;

#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Your name
    #[arg(long)]
    pub(crate) name: String,
    /// Your phone number (where the answer is sent)
    #[arg(long)]
    pub(crate) phone: String,
    /// Pre-fill the recipient's name so the link opens on the question
    #[arg(long, value_name = "RECIPIENT")]
    pub(crate) to: Option<String>,
    /// Override the configured public base URL
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Page URL (or bare query string)
    pub(crate) url: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
