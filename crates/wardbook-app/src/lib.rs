#![forbid(unsafe_code)]
//! Wardbook runtime: the role-gated page routes, the process-wide session
//! state, and the glue between them and the external Account & Records
//! Service.

use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use wardbook_service::RecordsService;

mod auth;
mod config;
mod forms;
mod guard;
mod http;
mod middleware;
mod session_file;

pub use auth::{
    load_local_session, reconcile_session, spawn_session_listener, AuthSnapshot, AuthState,
    ListenerGuard,
};
pub use config::AppConfig;
pub use forms::{today, FormError, PatientForm};
pub use guard::{
    decide, role_home, GuardOutcome, RouteAccess, ADMIN_ONLY, ANY_ROLE, DOCTOR_ONLY,
};
pub use http::{ApiError, ApiErrorCode};
pub use session_file::SessionFile;

pub const CRATE_NAME: &str = "wardbook-app";

/// How many records the dashboard's recent-patients widget shows. A display
/// policy applied after filtering, never inside it.
pub const RECENT_PREVIEW_LIMIT: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn RecordsService>,
    pub auth: Arc<AuthState>,
    pub session_file: Arc<SessionFile>,
    pub config: AppConfig,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<dyn RecordsService>, session_file: SessionFile) -> Self {
        Self::with_config(service, session_file, AppConfig::default())
    }

    #[must_use]
    pub fn with_config(
        service: Arc<dyn RecordsService>,
        session_file: SessionFile,
        config: AppConfig,
    ) -> Self {
        Self {
            service,
            auth: Arc::new(AuthState::new()),
            session_file: Arc::new(session_file),
            config,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::index_handler))
        .route(
            "/signup",
            get(http::handlers::sign_up_page_handler).post(http::handlers::sign_up_handler),
        )
        .route(
            "/signin",
            get(http::handlers::sign_in_page_handler).post(http::handlers::sign_in_handler),
        )
        .route("/signout", post(http::handlers::sign_out_handler))
        .route("/dashboard", get(http::handlers::dashboard_handler))
        .route(
            "/create-patient",
            get(http::handlers::create_patient_form_handler)
                .post(http::handlers::create_patient_handler),
        )
        .route("/patients", get(http::handlers::patients_handler))
        .fallback(http::handlers::not_found_handler)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
