use super::*;

/// Shared, read-only server state. Flow state never lives here: each request
/// rebuilds it from the page's URL or form fields.
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) settings: FlowSettings,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct CreateForm {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) phone: String,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct IntroForm {
    #[serde(default)]
    pub(crate) sender: String,
    #[serde(default)]
    pub(crate) phone: String,
    #[serde(default)]
    pub(crate) name: String,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RespondForm {
    #[serde(default)]
    pub(crate) sender: String,
    #[serde(default)]
    pub(crate) phone: String,
    #[serde(default)]
    pub(crate) name: String,
    /// Declines so far, carried by the page.
    #[serde(default)]
    pub(crate) declines: u64,
    pub(crate) answer: String,
}
