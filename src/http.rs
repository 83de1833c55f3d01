//! HTTP server for contact capture.
//!
//! Routes:
//! - `GET /` renders the submission form
//! - `POST /` validates and stores a contact (form-encoded or JSON body)
//! - `GET /contatos` lists every stored contact
//!
//! Every request passes through the access log middleware first.

use crate::access_log::{self, AccessLog};
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::validation;
use crate::views;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Json, Router, middleware};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub const SAVED_MESSAGE: &str = "Contato salvo com sucesso!";
pub const NOT_FOUND_MESSAGE: &str = "Página não encontrada";

/// Dependencies shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub access_log: AccessLog,
}

impl AppState {
    pub fn new(db: Database, access_log: AccessLog) -> Self {
        Self { db, access_log }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(contact_form).post(submit_contact))
        .route("/contatos", get(list_contacts))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.access_log.clone(),
            access_log::log_request,
        ))
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
///
/// Binds to `addr`; in-flight requests are drained on shutdown.
pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind HTTP server on {}: {}", addr, e);
        e
    })?;
    serve(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("Contact server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Contact server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

// ============================================================================
// Request body
// ============================================================================

/// Submitted fields, decoded by `Content-Type`.
///
/// JSON bodies must be objects. Form bodies become string values; a repeated
/// key keeps its last value. Any other content type (or none) yields an
/// empty mapping, which the schema then reports field by field.
#[derive(Debug)]
pub struct ContactPayload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for ContactPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/json") => {
                let Json(map) = Json::<Map<String, Value>>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::Payload(rejection.body_text()))?;
                Ok(Self(map))
            }
            Some("application/x-www-form-urlencoded") => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::Payload(rejection.body_text()))?;
                Ok(Self(
                    pairs
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                ))
            }
            _ => Ok(Self(Map::new())),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for GET / - the submission form.
async fn contact_form() -> Html<String> {
    Html(views::render_form())
}

/// Handler for POST / - validate, then store.
async fn submit_contact(
    State(state): State<AppState>,
    ContactPayload(input): ContactPayload,
) -> AppResult<&'static str> {
    let contact = validation::validate_contact(&input)?;
    let stored = state
        .db
        .contacts()
        .create(&contact)
        .await
        .map_err(AppError::Save)?;

    info!(id = stored.id, "Contact saved");
    Ok(SAVED_MESSAGE)
}

/// Handler for GET /contatos - every stored contact.
async fn list_contacts(State(state): State<AppState>) -> AppResult<Html<String>> {
    let contatos = state
        .db
        .contacts()
        .list_all()
        .await
        .map_err(AppError::List)?;
    Ok(Html(views::render_contacts(&contatos)))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}
