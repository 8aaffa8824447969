// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;
use wardbook_model::{Role, Session, StatusFacet};
use wardbook_query::{compute_stats, filter_patients, search_preview, PatientFilter};
use wardbook_service::NewAccount;

use crate::forms::{today, PatientForm};
use crate::guard::{decide, role_home, GuardOutcome, RouteAccess, ADMIN_ONLY, DOCTOR_ONLY};
use crate::http::error::{api_error_response, ApiError, ApiErrorCode};
use crate::{AppState, RECENT_PREVIEW_LIMIT};

fn page_data(value: Value) -> Response {
    Json(json!({"data": value})).into_response()
}

/// The neutral placeholder rendered while the bootstrap is still resolving.
/// Deliberately not a redirect: redirecting here would flash the sign-in
/// page at an operator whose session is about to be confirmed.
fn loading_placeholder() -> Response {
    Json(json!({"data": {"loading": true}})).into_response()
}

/// Applies the route guard for a role-restricted page. `Err` carries the
/// full early response (placeholder or redirect) to return as-is.
async fn require_role(state: &AppState, access: RouteAccess) -> Result<Session, Response> {
    let snapshot = state.auth.snapshot().await;
    match decide(snapshot.loading, snapshot.session.as_ref(), access) {
        GuardOutcome::Render => snapshot
            .session
            // Public routes never come through here.
            .ok_or_else(|| Redirect::to("/signin").into_response()),
        GuardOutcome::Loading => Err(loading_placeholder()),
        GuardOutcome::ToSignIn => Err(Redirect::to("/signin").into_response()),
        GuardOutcome::ToRoleHome(role) => Err(Redirect::to(role_home(role)).into_response()),
    }
}

async fn persist_session(state: &AppState, session: &Session) {
    if let Err(err) = state.session_file.save(session) {
        warn!(error = %err, "session persist failed");
    }
    state.auth.set_session(Some(session.clone())).await;
}

pub(crate) async fn index_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.auth.snapshot().await;
    page_data(json!({
        "product": "Wardbook Hospital Records",
        "signed_in_as": snapshot
            .session
            .map(|s| json!({"full_name": s.full_name, "role": s.role})),
    }))
}

pub(crate) async fn sign_up_page_handler() -> Response {
    page_data(json!({"page": "sign-up"}))
}

pub(crate) async fn sign_in_page_handler() -> Response {
    page_data(json!({"page": "sign-in"}))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignUpBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
}

pub(crate) async fn sign_up_handler(
    State(state): State<AppState>,
    Json(body): Json<SignUpBody>,
) -> Response {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() || body.role.is_empty()
    {
        return api_error_response(ApiError::new(
            ApiErrorCode::ValidationFailed,
            "Please fill in all fields",
            Value::Null,
        ));
    }
    let role = match Role::parse(&body.role) {
        Ok(role) => role,
        Err(err) => {
            return api_error_response(ApiError::new(
                ApiErrorCode::ValidationFailed,
                err.0,
                Value::Null,
            ))
        }
    };
    let account = NewAccount {
        email: body.email,
        password: body.password,
        full_name: body.name,
        role,
    };
    match state.service.sign_up(account).await {
        Ok(session) => {
            persist_session(&state, &session).await;
            Redirect::to(role_home(session.role)).into_response()
        }
        Err(err) => api_error_response(ApiError::from(err)),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn sign_in_handler(
    State(state): State<AppState>,
    Json(body): Json<SignInBody>,
) -> Response {
    if body.email.is_empty() || body.password.is_empty() {
        return api_error_response(ApiError::new(
            ApiErrorCode::ValidationFailed,
            "Please fill in all fields",
            Value::Null,
        ));
    }
    match state.service.sign_in(&body.email, &body.password).await {
        Ok(session) => {
            persist_session(&state, &session).await;
            Redirect::to(role_home(session.role)).into_response()
        }
        Err(err) => api_error_response(ApiError::from(err)),
    }
}

pub(crate) async fn sign_out_handler(State(state): State<AppState>) -> Response {
    match state.service.sign_out().await {
        Ok(()) => {
            state.session_file.clear();
            state.auth.set_session(None).await;
            Redirect::to("/").into_response()
        }
        Err(err) => api_error_response(ApiError::from(err)),
    }
}

pub(crate) async fn dashboard_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let session = match require_role(&state, ADMIN_ONLY).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let records = match state.service.list_patients().await {
        Ok(records) => records,
        Err(err) => return api_error_response(ApiError::from(err)),
    };
    let stats = compute_stats(&records);
    let search = params.get("search").cloned().unwrap_or_default();
    let mut recent = search_preview(&records, &search);
    recent.truncate(RECENT_PREVIEW_LIMIT);
    page_data(json!({
        "welcome": session.full_name,
        "stats": stats,
        "recent_patients": recent,
    }))
}

pub(crate) async fn patients_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = require_role(&state, ADMIN_ONLY).await {
        return response;
    }
    let facet = match params.get("status") {
        None => StatusFacet::All,
        Some(raw) => match StatusFacet::parse(raw) {
            Ok(facet) => facet,
            Err(_) => return api_error_response(ApiError::invalid_param("status", raw)),
        },
    };
    let search = params.get("search").cloned().unwrap_or_default();
    let records = match state.service.list_patients().await {
        Ok(records) => records,
        Err(err) => return api_error_response(ApiError::from(err)),
    };
    let patients = filter_patients(&records, &PatientFilter::new(search, facet));
    page_data(json!({"total": patients.len(), "patients": patients}))
}

pub(crate) async fn create_patient_form_handler(State(state): State<AppState>) -> Response {
    if let Err(response) = require_role(&state, DOCTOR_ONLY).await {
        return response;
    }
    page_data(json!({"form": PatientForm::initial(today())}))
}

pub(crate) async fn create_patient_handler(
    State(state): State<AppState>,
    Json(form): Json<PatientForm>,
) -> Response {
    let session = match require_role(&state, DOCTOR_ONLY).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let record = match form.validate(&session.account_id) {
        Ok(record) => record,
        Err(err) => {
            let api = ApiError::from(err);
            // The typed values come back with the error so nothing is lost
            // on a rejected submission.
            return (api.status(), Json(json!({"error": api, "form": form}))).into_response();
        }
    };
    match state.service.create_patient(record).await {
        Ok(stored) => page_data(json!({
            "message": "Patient record created successfully",
            "record": stored,
            "form": PatientForm::initial(today()),
        })),
        Err(err) => {
            let api = ApiError::from(err);
            (api.status(), Json(json!({"error": api, "form": form}))).into_response()
        }
    }
}

pub(crate) async fn not_found_handler(uri: Uri) -> Response {
    warn!(path = %uri.path(), "attempted to access non-existent route");
    api_error_response(ApiError::new(
        ApiErrorCode::RouteNotFound,
        "Oops! Page not found",
        json!({"path": uri.path()}),
    ))
}
