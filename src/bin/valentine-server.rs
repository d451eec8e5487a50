use std::sync::Arc;

use axum::extract::{Form, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router};

use valentine::config::AppConfig;
use valentine::flow::FlowSettings;

#[path = "valentine_server/types.rs"]
mod types;
use self::types::*;
#[path = "valentine_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "valentine_server/pages.rs"]
mod pages;
#[path = "valentine_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "valentine_server/routes.rs"]
mod routes;
#[path = "valentine_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
