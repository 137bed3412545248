//! Feedback web server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use feedback::io::config::{DEFAULT_CONFIG_FILE, load_config};
use feedback::io::store::open_store;
use feedback::logging;
use feedback_web::AppState;
use tracing::info;

#[derive(Parser)]
#[command(name = "feedback-web")]
#[command(about = "Event feedback form and submissions listing")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind the server to (overrides server.bind)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("feedback_web=info,feedback=info,tower_http=info");

    let args = Args::parse();
    let cfg = load_config(&args.config)?;
    let store = open_store(&cfg.store)?;
    info!(backend = store.backend_tag(), "starting feedback-web");

    let state = AppState::new(store, Duration::from_secs(cfg.form.success_display_secs))?;

    let bind = args.bind.unwrap_or(cfg.server.bind);
    let port = args.port.unwrap_or(cfg.server.port);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    feedback_web::serve(listener, state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_optional_overrides() {
        let args = Args::parse_from(["feedback-web"]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(args.bind.is_none());
        assert!(args.port.is_none());

        let args = Args::parse_from(["feedback-web", "--port", "8080", "--bind", "0.0.0.0"]);
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
    }
}
