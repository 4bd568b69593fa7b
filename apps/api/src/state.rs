use std::sync::Arc;

use crate::auth::google::IdentityProvider;
use crate::auth::session::SessionKeys;
use crate::config::Config;
use crate::generation::pipeline::Pipeline;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub pipeline: Arc<Pipeline>,
    /// OAuth provider. Google in production, a stub in tests.
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionKeys,
}
