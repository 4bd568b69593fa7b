//! Shared fixtures for router tests: in-memory store, stub model, stub OAuth
//! provider and a multipart body builder.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;

use crate::auth::google::{IdentityError, IdentityProvider};
use crate::auth::session::{SessionKeys, COOKIE_NAME};
use crate::config::Config;
use crate::generation::pipeline::Pipeline;
use crate::generation::writer::LetterWriter;
use crate::job_posting::JobResolver;
use crate::llm_client::mock::StubModel;
use crate::models::user::{User, UserProfile};
use crate::resume::{DocumentFormat, ExtractError, ResumeExtractor};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::Store;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        openai_api_key: "sk-test".into(),
        openai_model: "stub".into(),
        openai_base_url: "http://127.0.0.1:1/v1".into(),
        google_client_id: "client-123".into(),
        google_client_secret: "shh".into(),
        jwt_secret: JWT_SECRET.into(),
        frontend_url: "http://localhost:3000".into(),
        public_url: "http://api.test".into(),
        port: 0,
        log_level: "debug".into(),
    }
}

/// Treats the uploaded bytes as the document's text, so tests control
/// exactly what "extraction" yields. DOCX keeps the real parser.
fn pdf_as_text(data: &[u8]) -> Result<String, ExtractError> {
    Ok(String::from_utf8_lossy(data).trim().to_string())
}

/// Accepts any code except `"bad"` and always returns the same profile.
pub struct StubIdentity {
    pub profile: UserProfile,
}

impl Default for StubIdentity {
    fn default() -> Self {
        Self {
            profile: UserProfile {
                google_id: "google-1".into(),
                email: Some("ada@example.com".into()),
                name: Some("Ada Lovelace".into()),
                picture: Some("https://example.com/ada.png".into()),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    fn authorize_url(&self, redirect_uri: &str) -> String {
        format!("https://accounts.test/auth?redirect_uri={redirect_uri}")
    }

    async fn exchange(&self, code: &str, _redirect_uri: &str) -> Result<UserProfile, IdentityError> {
        if code == "bad" {
            // An unroutable request yields a genuine reqwest error.
            let err = reqwest::Client::new()
                .get("http://127.0.0.1:1/token")
                .send()
                .await
                .unwrap_err();
            return Err(err.into());
        }
        Ok(self.profile.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub model: Arc<StubModel>,
    pub sessions: SessionKeys,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_model(StubModel::replying(
            "Dear Hiring Manager,\n\nI would love to join Acme. Sincerely, John",
        ))
    }

    pub fn with_model(model: StubModel) -> Self {
        Self::build(
            model,
            ResumeExtractor::standard().with_parser(DocumentFormat::Pdf, pdf_as_text),
        )
    }

    /// Uses the production PDF and DOCX parsers.
    pub fn with_real_documents() -> Self {
        Self::build(
            StubModel::replying("Dear Hiring Manager, I would love to join Acme."),
            ResumeExtractor::standard(),
        )
    }

    fn build(model: StubModel, extractor: ResumeExtractor) -> Self {
        let store = Arc::new(MemoryStore::default());
        let model = Arc::new(model);
        let sessions = SessionKeys::new(JWT_SECRET);

        let pipeline = Pipeline::new(
            extractor,
            JobResolver::new().unwrap(),
            LetterWriter::new(model.clone()),
            store.clone(),
        );
        let state = AppState {
            config: test_config(),
            store: store.clone(),
            pipeline: Arc::new(pipeline),
            identity: Arc::new(StubIdentity::default()),
            sessions: sessions.clone(),
        };

        Self {
            router: build_router(state),
            store,
            model,
            sessions,
        }
    }

    /// Creates a user and returns it with a ready-to-send `Cookie` header value.
    pub async fn sign_in(&self, google_id: &str) -> (User, String) {
        let user = self
            .store
            .upsert_user(&UserProfile {
                google_id: google_id.into(),
                email: Some(format!("{google_id}@example.com")),
                ..UserProfile::default()
            })
            .await
            .unwrap();
        let token = self.sessions.issue(user.id).unwrap();
        (user, format!("{COOKIE_NAME}={token}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart bodies
// ────────────────────────────────────────────────────────────────────────────

const BOUNDARY: &str = "----cover-letter-test-boundary";

#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Bytes {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Bytes::from(self.body)
    }
}
