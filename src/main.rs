#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use domain::models::ChatEvent;
use domain::services::ChatService;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use crate::application::cli;
use crate::application::ui;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! Concierge has failed with the following app version and error.\n\nVersion: {}\nError: {:?}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .red()
    );

    process::exit(1);
}

#[tokio::main]
async fn main() {
    better_panic::Settings::auto().install();

    let debug_log_dir = env::var("CONCIERGE_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("concierge")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("concierge")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let ready_res = cli::parse().await;
    if let Err(ready_err) = ready_res {
        handle_error(ready_err);
        return;
    }
    if !ready_res.unwrap() {
        process::exit(0);
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<ChatEvent>();

    let service_res = ChatService::new(event_tx).await;
    if let Err(service_err) = service_res {
        handle_error(service_err);
        return;
    }

    if let Err(err) = ui::start(service_res.unwrap(), event_rx).await {
        handle_error(err);
    }

    process::exit(0);
}
