use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use story_application::{App, InMemoryDocument, default_routes};
use tracing_subscriber::EnvFilter;

mod command;
mod render;
mod shell;
mod wiring;

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
const LOG_ENV: &str = "STORY_SHARE_LOG";

#[derive(Parser)]
#[command(name = "story-share")]
#[command(about = "Story Share - browse, share and bookmark geotagged photo stories", long_about = None)]
struct Cli {
    /// Location to open first, e.g. "#/story/42"
    #[arg(default_value = "/")]
    initial: String,

    /// Directory holding config.toml, session.toml and bookmarks.toml
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Keep the session and bookmarks in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Endpoint of an existing push subscription to register when
    /// notifications are enabled
    #[arg(long)]
    push_endpoint: Option<String>,

    #[arg(long, default_value = "", requires = "push_endpoint")]
    push_p256dh: String,

    #[arg(long, default_value = "", requires = "push_endpoint")]
    push_auth: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let setup = wiring::Setup {
        config_dir: cli.config_dir,
        ephemeral: cli.ephemeral,
        push_endpoint: cli.push_endpoint,
        push_p256dh: cli.push_p256dh,
        push_auth: cli.push_auth,
    };
    let wiring = wiring::build(&setup)?;

    let document = Arc::new(InMemoryDocument::new());
    let app = App::new(default_routes(wiring.services)?, document.clone());

    shell::Shell::new(app, document, wiring.maps)
        .run(&cli.initial)
        .await
}
