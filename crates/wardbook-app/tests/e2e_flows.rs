// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wardbook_app::{
    build_router, load_local_session, reconcile_session, today, AppState, SessionFile,
};
use wardbook_model::{Gender, PatientRecord, RecordedStatus};
use wardbook_service::{FakeRecordsService, ServiceError, ServiceErrorCode};

async fn serve(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

async fn spawn_app(service: Arc<FakeRecordsService>) -> (SocketAddr, AppState, TempDir) {
    let dir = tempdir().expect("tempdir");
    let state = AppState::new(service, SessionFile::new(dir.path().join("session.json")));
    load_local_session(&state).await;
    reconcile_session(&state).await;
    let addr = serve(state.clone()).await;
    (addr, state, dir)
}

async fn http(addr: SocketAddr, raw: String) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect server");
    stream.write_all(raw.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    response
}

async fn get(addr: SocketAddr, path: &str) -> String {
    http(
        addr,
        format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"),
    )
    .await
}

async fn post_json(addr: SocketAddr, path: &str, body: &str) -> String {
    http(
        addr,
        format!(
            "POST {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

const DOCTOR_SIGNUP: &str = r#"{"name":"Dr. Ayesha Malik","email":"doctor@ward.example","password":"hunter2hunter2","role":"doctor"}"#;
const ADMIN_SIGNUP: &str = r#"{"name":"Ward Admin","email":"admin@ward.example","password":"correct-horse","role":"admin"}"#;

const COMPLETE_PATIENT: &str = r#"{
    "name": "Ahmed Khan",
    "age": "28",
    "gender": "Male",
    "cnic": "36925-8147036-9",
    "phone_number": "+92-333-5555555",
    "email": "ahmed.khan@example.com",
    "disease": "Acute Appendicitis",
    "visit_date": "2023-10-18",
    "status": "Discharged"
}"#;

fn stored_patient(id: &str, name: &str, disease: &str, cnic: &str, status: &str) -> PatientRecord {
    PatientRecord {
        id: id.to_string(),
        name: name.to_string(),
        age: 45,
        gender: Gender::Male,
        cnic: cnic.to_string(),
        phone_number: "+92-300-1234567".to_string(),
        email: None,
        address: None,
        disease: disease.to_string(),
        disease_description: None,
        visit_date: NaiveDate::from_ymd_opt(2023, 10, 15).expect("date"),
        visit_count: 3,
        doctor_notes: None,
        status: RecordedStatus::from_raw(status),
        doctor_id: Some("acc-9".to_string()),
        created_at: None,
    }
}

#[tokio::test]
async fn doctor_signs_up_creates_a_record_and_an_admin_finds_it() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service.clone()).await;

    let response = post_json(addr, "/signup", DOCTOR_SIGNUP).await;
    assert!(response.starts_with("HTTP/1.1 303 See Other\r\n"), "{response}");
    assert!(response.contains("location: /create-patient"), "{response}");

    let response = post_json(addr, "/create-patient", COMPLETE_PATIENT).await;
    assert!(response.contains("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("Patient record created successfully"));
    assert!(response.contains("\"visit_count\":0"));
    // The reset form defaults the visit date back to today.
    assert!(response.contains(&format!("\"visit_date\":\"{}\"", today())));

    let response = post_json(addr, "/signout", "{}").await;
    assert!(response.contains("location: /"), "{response}");

    let response = post_json(addr, "/signup", ADMIN_SIGNUP).await;
    assert!(response.contains("location: /dashboard"), "{response}");

    let response = get(addr, "/patients").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("Ahmed Khan"));
    assert!(response.contains("\"doctor_id\":\"acc-1\""));
    assert!(response.contains("\"visit_count\":0"));
}

#[tokio::test]
async fn admin_search_combines_text_and_status_facet() {
    let service = Arc::new(FakeRecordsService::default());
    {
        let mut patients = service.patients.lock().await;
        patients.push(stored_patient("p1", "Ahmed Khan", "Appendicitis", "36925-8147036-9", "Discharged"));
        patients.push(stored_patient("p2", "Bilal Khanzada", "Migraine", "25836-9147258-3", "Active"));
        patients.push(stored_patient("p3", "Sarah Smith", "Gastritis", "98765-4321098-7", "Discharged"));
    }
    let (addr, _state, _dir) = spawn_app(service).await;

    post_json(addr, "/signup", ADMIN_SIGNUP).await;

    let response = get(addr, "/patients?search=Khan&status=discharged").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("\"total\":1"), "{response}");
    assert!(response.contains("Ahmed Khan"));
    assert!(!response.contains("Bilal Khanzada"));
    assert!(!response.contains("Sarah Smith"));
}

#[tokio::test]
async fn dashboard_shows_stats_and_a_three_record_preview() {
    let service = Arc::new(FakeRecordsService::default());
    {
        let mut patients = service.patients.lock().await;
        for n in 0..5 {
            patients.push(stored_patient(
                &format!("p{n}"),
                &format!("Patient {n}"),
                "Hypertension",
                &format!("0000{n}-0000000-{n}"),
                "Active",
            ));
        }
    }
    let (addr, _state, _dir) = spawn_app(service).await;

    post_json(addr, "/signup", ADMIN_SIGNUP).await;

    let response = get(addr, "/dashboard").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("\"welcome\":\"Ward Admin\""));
    assert!(response.contains("\"total_patients\":5"));
    assert!(response.contains("\"active_patients\":5"));
    assert!(response.contains("\"total_visits\":15"));
    // Preview is capped at three records.
    assert!(response.contains("Patient 2"));
    assert!(!response.contains("Patient 3"));
}

#[tokio::test]
async fn protected_routes_redirect_signed_out_operators_to_sign_in() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service).await;

    for path in ["/dashboard", "/patients", "/create-patient"] {
        let response = get(addr, path).await;
        assert!(response.starts_with("HTTP/1.1 303 See Other\r\n"), "{path}: {response}");
        assert!(response.contains("location: /signin"), "{path}: {response}");
    }
}

#[tokio::test]
async fn wrong_role_is_sent_to_its_own_landing_page() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service).await;

    post_json(addr, "/signup", DOCTOR_SIGNUP).await;
    for path in ["/dashboard", "/patients"] {
        let response = get(addr, path).await;
        assert!(response.contains("location: /create-patient"), "{path}: {response}");
    }

    post_json(addr, "/signout", "{}").await;
    post_json(addr, "/signup", ADMIN_SIGNUP).await;
    let response = get(addr, "/create-patient").await;
    assert!(response.contains("location: /dashboard"), "{response}");
}

#[tokio::test]
async fn invalid_submissions_never_reach_the_service() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service.clone()).await;
    post_json(addr, "/signup", DOCTOR_SIGNUP).await;

    let missing_name = COMPLETE_PATIENT.replace("Ahmed Khan", "");
    let response = post_json(addr, "/create-patient", &missing_name).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
    assert!(response.contains("Please fill in all required fields"));

    let bad_age = COMPLETE_PATIENT.replace("\"28\"", "\"abc\"");
    let response = post_json(addr, "/create-patient", &bad_age).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");

    assert_eq!(service.create_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn service_failure_surfaces_verbatim_and_echoes_the_form() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service.clone()).await;
    post_json(addr, "/signup", DOCTOR_SIGNUP).await;

    *service.fail_create.lock().await = Some(ServiceError::new(
        ServiceErrorCode::Internal,
        "permission denied for table patients",
    ));
    let response = post_json(addr, "/create-patient", COMPLETE_PATIENT).await;
    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"), "{response}");
    assert!(response.contains("permission denied for table patients"));
    // The typed values come back so the operator can retry.
    assert!(response.contains("\"form\""));
    assert!(response.contains("Ahmed Khan"));
    assert_eq!(service.create_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn unmatched_routes_render_not_found() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service).await;

    let response = get(addr, "/records/export").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
    assert!(response.contains("Oops! Page not found"));
    assert!(response.contains("/records/export"));
}

#[tokio::test]
async fn invalid_status_facet_is_rejected_at_the_boundary() {
    let service = Arc::new(FakeRecordsService::default());
    let (addr, _state, _dir) = spawn_app(service).await;
    post_json(addr, "/signup", ADMIN_SIGNUP).await;

    let response = get(addr, "/patients?status=archived").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
    assert!(response.contains("invalid query parameter: status"));
}

#[tokio::test]
async fn pages_render_a_neutral_placeholder_while_loading() {
    let service = Arc::new(FakeRecordsService::default());
    let dir = tempdir().expect("tempdir");
    let state = AppState::new(service, SessionFile::new(dir.path().join("session.json")));
    load_local_session(&state).await;
    // Reconciliation deliberately not run: the app is still loading.
    let addr = serve(state.clone()).await;

    let response = get(addr, "/dashboard").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("\"loading\":true"));

    // Public pages render regardless.
    let response = get(addr, "/").await;
    assert!(response.contains("Wardbook Hospital Records"), "{response}");
}
