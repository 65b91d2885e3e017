//! discovery-search: search and follow-up questions against a Discovery Engine data store
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::{Parser, Subcommand};
use discovery_search::{
    config::{self, ServerMode, Settings},
    network::HttpClient,
    provider::{DiscoveryEngineProvider, SearchProvider},
    web::{create_router, AppState},
    ConversationSession, Dialogue, ExitSentinel, Search,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const INITIAL_QUERY: &str = "apa itu sisa kuota";

#[derive(Debug, Parser)]
#[command(name = "discovery-search", version, about)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "DISCOVERY_SETTINGS_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,
        /// Server port
        #[arg(long)]
        port: Option<u16>,
        /// What POST /search does: search or conversation
        #[arg(long)]
        mode: Option<ServerMode>,
    },
    /// Run one search and print normalized results with the summary
    Search {
        /// Search query
        query: String,
    },
    /// Ask questions interactively within one conversation
    Chat {
        /// First question
        #[arg(default_value = INITIAL_QUERY)]
        query: String,
    },
    /// Send a list of questions as successive turns of one conversation
    Batch {
        /// Questions, in order
        #[arg(required = true)]
        queries: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = config::load(cli.config.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting discovery-search v{}", discovery_search::VERSION);

    // Initialize provider
    let client = HttpClient::with_settings(&settings.provider)?;
    let provider: Arc<dyn SearchProvider> =
        Arc::new(DiscoveryEngineProvider::new(&settings.provider, client)?);

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        mode: None,
    }) {
        Command::Serve { host, port, mode } => {
            if let Some(host) = host {
                settings.server.bind_address = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(mode) = mode {
                settings.server.mode = mode;
            }
            serve(settings, provider).await
        }
        Command::Search { query } => {
            let search = Search::new(provider, settings.search.clone());
            let outcome = search.execute(&query).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Chat { query } => {
            let mut session = ConversationSession::new(provider, &settings.conversation);
            let sentinel = ExitSentinel::from_settings(&settings.conversation);
            let result = Dialogue::new(&mut session, sentinel)
                .run(&query, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await;
            session.close().await;
            result.map(|turns| info!("Chat finished after {} turns", turns))
        }
        Command::Batch { queries } => {
            let mut session = ConversationSession::new(provider, &settings.conversation);
            let sentinel = ExitSentinel::from_settings(&settings.conversation);
            let turns = Dialogue::new(&mut session, sentinel).run_batch(&queries).await;
            session.close().await;
            for turn in turns? {
                print!("{}", turn.render());
            }
            Ok(())
        }
    }
}

async fn serve(settings: Settings, provider: Arc<dyn SearchProvider>) -> Result<()> {
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let mode = settings.server.mode;

    // Create application state
    let state = AppState::new(settings, provider)?;
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    info!("Starting server on http://{} ({:?} mode)", addr, mode);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
