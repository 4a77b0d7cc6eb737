//! Order Desk server binary.
//!
//! Loads configuration and the store file, wires the dialogue engine and
//! adapters together, and serves the order-taking API.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use order_desk::adapters::ai::{KeywordInterpreter, LlmConfig, LlmInterpreter};
use order_desk::adapters::catalog::load_store_file;
use order_desk::adapters::http::{order_router, OrderAppState};
use order_desk::adapters::session::InMemorySessionStore;
use order_desk::adapters::ticket::FileTicketSink;
use order_desk::application::handlers::order::{StartConversationHandler, TakeTurnHandler};
use order_desk::config::AppConfig;
use order_desk::domain::catalog::CatalogIndex;
use order_desk::domain::dialogue::DialogueEngine;
use order_desk::ports::UtteranceInterpreter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.server.log_level))
        .init();

    // A store that cannot be loaded is fatal: refusing to start beats
    // running with a menu that never matches.
    let store = load_store_file(&config.store.file)?;
    let index = Arc::new(CatalogIndex::build(&store.catalog));
    let settings = Arc::new(store.settings);
    let prices = Arc::new(store.prices);

    let sessions = Arc::new(InMemorySessionStore::with_ttl(Duration::from_secs(
        config.store.session_ttl_minutes * 60,
    )));
    sessions.spawn_sweeper(Duration::from_secs(60));

    let tickets = Arc::new(FileTicketSink::open(&config.store.ticket_file).await?);

    let interpreter: Arc<dyn UtteranceInterpreter> = match &config.ai.api_key {
        Some(api_key) if config.ai.enabled => {
            info!(model = %config.ai.model, "using LLM interpreter");
            Arc::new(LlmInterpreter::new(
                LlmConfig::new(api_key.expose_secret().clone())
                    .with_model(config.ai.model.clone())
                    .with_base_url(config.ai.base_url.clone())
                    .with_timeout(Duration::from_secs(config.ai.timeout_secs)),
                index.clone(),
                settings.clone(),
            ))
        }
        _ => Arc::new(KeywordInterpreter::new(index.clone(), settings.clone())),
    };

    let engine = Arc::new(DialogueEngine::new((*index).clone(), (*settings).clone()));

    let state = OrderAppState::new(
        Arc::new(StartConversationHandler::new(
            sessions.clone(),
            settings.clone(),
        )),
        Arc::new(TakeTurnHandler::new(
            sessions, interpreter, engine, prices, tickets,
        )),
    );

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<http::HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = order_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    info!(%addr, environment = ?config.server.environment, "order-desk listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
