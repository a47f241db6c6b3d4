use std::path::Path;

use tracing::info;

use tidepool::chat::server::{self, DEFAULT_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // One optional argument: the listening port. Anything unparsable
    // falls back to the default.
    let port = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    info!("tidepool — a quiet pool for chatter");

    server::run(&format!("0.0.0.0:{port}"), Path::new("chat.log")).await
}
