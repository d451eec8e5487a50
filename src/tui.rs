use anyhow::Result;

use crate::config::AppConfig;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    /// Page URL to start from; `None` opens the creator form.
    pub url: Option<String>,
    pub config: AppConfig,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
