pub mod clipboard;
pub mod config;
pub mod escalation;
pub mod flow;
pub mod link;
pub mod logging;
pub mod model;
pub mod notify;
pub mod tui;

mod tui_shell;
