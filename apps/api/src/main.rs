mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod history;
mod job_posting;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::google::GoogleIdentity;
use crate::auth::session::SessionKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::generation::pipeline::Pipeline;
use crate::generation::writer::LetterWriter;
use crate::job_posting::JobResolver;
use crate::llm_client::{ChatModel, OpenAiClient};
use crate::resume::ResumeExtractor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                config.log_level.to_lowercase()
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_jwt_secret() {
        warn!("JWT_SECRET is not set; sessions are signed with the default development secret");
    }

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store: Arc<dyn Store> = Arc::new(PgStore::new(db));

    // Initialize LLM client
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_base_url.clone(),
    ));
    info!("LLM client initialized (model: {})", model.model());

    let extractor = ResumeExtractor::standard();
    info!("Resume formats: {}", extractor.supported_extensions());

    let pipeline = Pipeline::new(
        extractor,
        JobResolver::new()?,
        LetterWriter::new(model),
        Arc::clone(&store),
    );

    // Build app state
    let state = AppState {
        identity: Arc::new(GoogleIdentity::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
        )),
        sessions: SessionKeys::new(&config.jwt_secret),
        config: config.clone(),
        store,
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to FRONTEND_URL once cookies are cross-site

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
