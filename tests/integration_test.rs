// Integration tests for petshop-manager: the API client and the pending
// actions of the update loop, exercised against an in-process mock registry.

use std::time::Duration;

use petshop_manager::api::{ApiClient, ApiConfig, ApiError};
use petshop_manager::app::form::{ClientDraft, FormState, PhoneDraft};
use petshop_manager::app::update::perform_pending_action;
use petshop_manager::app::{AppState, InputMode, ModalState, PendingAction};
use petshop_manager::validate::Field;

/// Minimal in-memory registry speaking the same protocol as the real API:
/// Portuguese JSON keys, `{"error": ...}` failure bodies, substring search,
/// and duplicate email/CPF rejection.
mod server {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct Registry {
        next_id: i64,
        clients: Vec<Value>,
    }

    type Db = Arc<RwLock<Registry>>;

    pub fn app() -> Router {
        Router::new()
            .route("/clientes", get(list).post(create))
            .route("/clientes/{id}", get(fetch).put(update).delete(remove))
            .with_state(Db::default())
    }

    fn matches(client: &Value, term: &str) -> bool {
        ["nome", "cpf", "email"].iter().any(|key| {
            client[*key]
                .as_str()
                .map(|v| v.to_lowercase().contains(term))
                .unwrap_or(false)
        })
    }

    async fn list(
        State(db): State<Db>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let db = db.read().await;
        let out: Vec<Value> = match params.get("search") {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                db.clients
                    .iter()
                    .filter(|c| matches(c, &term))
                    .cloned()
                    .collect()
            }
            _ => db.clients.clone(),
        };
        Json(Value::Array(out))
    }

    async fn create(
        State(db): State<Db>,
        Json(mut body): Json<Value>,
    ) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
        let mut db = db.write().await;
        if db.clients.iter().any(|c| c["cpf"] == body["cpf"]) {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({"error": "CPF already registered"})),
            ));
        }
        if body["email"].is_string() && db.clients.iter().any(|c| c["email"] == body["email"]) {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({"error": "Email already registered"})),
            ));
        }
        db.next_id += 1;
        let now = chrono::Utc::now().to_rfc3339();
        body["id"] = json!(db.next_id);
        body["createdAt"] = json!(now);
        body["updatedAt"] = json!(now);
        db.clients.push(body.clone());
        Ok((StatusCode::CREATED, Json(body)))
    }

    async fn fetch(
        State(db): State<Db>,
        Path(id): Path<i64>,
    ) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
        let db = db.read().await;
        db.clients
            .iter()
            .find(|c| c["id"] == json!(id))
            .cloned()
            .map(Json)
            .ok_or((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "client not found"})),
            ))
    }

    async fn update(
        State(db): State<Db>,
        Path(id): Path<i64>,
        Json(mut body): Json<Value>,
    ) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
        let mut db = db.write().await;
        let Some(slot) = db.clients.iter_mut().find(|c| c["id"] == json!(id)) else {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "client not found"})),
            ));
        };
        body["id"] = json!(id);
        body["createdAt"] = slot["createdAt"].clone();
        body["updatedAt"] = json!(chrono::Utc::now().to_rfc3339());
        *slot = body.clone();
        Ok(Json(body))
    }

    async fn remove(State(db): State<Db>, Path(id): Path<i64>) -> StatusCode {
        let mut db = db.write().await;
        let before = db.clients.len();
        db.clients.retain(|c| c["id"] != json!(id));
        if db.clients.len() < before {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::NOT_FOUND
        }
    }
}

fn start_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    listener.set_nonblocking(true).expect("nonblocking");
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, server::app()).await.expect("serve");
        });
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
}

fn wait_ready(api: &ApiClient) {
    for _ in 0..100 {
        if api.list(None).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("mock server did not start");
}

fn sample_draft(name: &str, cpf: &str, email: &str) -> ClientDraft {
    let mut draft = ClientDraft::new();
    draft.name = name.to_string();
    draft.email = email.to_string();
    draft.cpf = cpf.to_string();
    draft.address.state = "SP".to_string();
    draft.address.city = "Sao Paulo".to_string();
    draft.address.neighborhood = "Centro".to_string();
    draft.address.street = "Rua A".to_string();
    draft.address.number = "10".to_string();
    draft.address.postal_code = "01000-000".to_string();
    draft.phones = vec![PhoneDraft {
        area_code: "11".to_string(),
        number: "987654321".to_string(),
    }];
    draft
}

fn idle_app() -> AppState {
    let mut app = AppState::new();
    app.pending = None;
    app.loading = false;
    app
}

#[test]
fn full_crud_lifecycle() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    assert!(api.list(None).unwrap().is_empty());

    let payload = sample_draft("Ana Souza", "123.456.789-01", "ana@example.com").to_payload();
    let created = api.create(&payload).unwrap();
    assert_eq!(created.name, "Ana Souza");
    assert_eq!(created.cpf, "12345678901");
    assert!(created.created_at.is_some());

    let fetched = api.get(created.id).unwrap();
    assert_eq!(fetched.email.as_deref(), Some("ana@example.com"));

    let mut draft = ClientDraft::from_client(&fetched);
    draft.name = "Ana S. Lima".to_string();
    let updated = api.update(created.id, &draft.to_payload()).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ana S. Lima");
    assert_eq!(updated.created_at, created.created_at);

    api.remove(created.id).unwrap();
    let err = api.get(created.id).unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
    assert!(api.list(None).unwrap().is_empty());
}

#[test]
fn search_is_filtered_by_the_server() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    api.create(&sample_draft("Ana Souza", "111.222.333-44", "ana@example.com").to_payload())
        .unwrap();
    api.create(&sample_draft("Bruno Costa", "555.666.777-88", "bruno@example.com").to_payload())
        .unwrap();

    let hits = api.list(Some("ana")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Ana Souza");

    // CPF substrings match too
    let hits = api.list(Some("555666")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Bruno Costa");

    assert!(api.list(Some("zzz")).unwrap().is_empty());
    assert_eq!(api.list(None).unwrap().len(), 2);
}

#[test]
fn successful_save_dismisses_the_form_and_refreshes_once() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    let mut app = idle_app();
    let mut form = FormState::create();
    form.draft = sample_draft("Ana Souza", "123.456.789-01", "ana@example.com");
    form.submitting = true;
    app.modal = Some(ModalState::Form(form));
    app.input_mode = InputMode::Modal;

    perform_pending_action(&mut app, &api, PendingAction::Save);

    assert!(app.modal.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.pending, Some(PendingAction::Refresh));
    assert!(app.loading);

    let action = app.pending.take().unwrap();
    perform_pending_action(&mut app, &api, action);
    assert_eq!(app.clients.len(), 1);
    assert!(!app.loading);
    assert!(app.pending.is_none());
}

#[test]
fn duplicate_cpf_lands_on_the_cpf_field() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    api.create(&sample_draft("Ana Souza", "123.456.789-01", "ana@example.com").to_payload())
        .unwrap();

    let mut app = idle_app();
    let mut form = FormState::create();
    form.draft = sample_draft("Outra Pessoa", "123.456.789-01", "outra@example.com");
    form.submitting = true;
    app.modal = Some(ModalState::Form(form));
    app.input_mode = InputMode::Modal;

    perform_pending_action(&mut app, &api, PendingAction::Save);

    match &app.modal {
        Some(ModalState::Form(form)) => {
            assert!(!form.submitting);
            assert_eq!(
                form.errors.get(&Field::Cpf).unwrap(),
                "CPF already registered"
            );
            assert!(form.server_error.is_none());
        }
        other => panic!("form should stay open, got {other:?}"),
    }
    assert!(app.pending.is_none());
    assert_eq!(app.input_mode, InputMode::Modal);
}

#[test]
fn duplicate_email_lands_on_the_email_field() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    api.create(&sample_draft("Ana Souza", "123.456.789-01", "ana@example.com").to_payload())
        .unwrap();

    let mut app = idle_app();
    let mut form = FormState::create();
    form.draft = sample_draft("Outra Pessoa", "999.888.777-66", "ana@example.com");
    form.submitting = true;
    app.modal = Some(ModalState::Form(form));
    app.input_mode = InputMode::Modal;

    perform_pending_action(&mut app, &api, PendingAction::Save);

    match &app.modal {
        Some(ModalState::Form(form)) => {
            assert_eq!(
                form.errors.get(&Field::Email).unwrap(),
                "Email already registered"
            );
        }
        other => panic!("form should stay open, got {other:?}"),
    }
}

#[test]
fn update_goes_through_the_same_save_action() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    let created = api
        .create(&sample_draft("Ana Souza", "123.456.789-01", "ana@example.com").to_payload())
        .unwrap();

    let mut app = idle_app();
    let mut form = FormState::edit(&created);
    form.draft.name = "Ana S. Lima".to_string();
    form.submitting = true;
    app.modal = Some(ModalState::Form(form));
    app.input_mode = InputMode::Modal;

    perform_pending_action(&mut app, &api, PendingAction::Save);
    assert!(app.modal.is_none());

    let listed = api.list(None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Ana S. Lima");
}

#[test]
fn delete_removes_the_client_and_refreshes() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    let created = api
        .create(&sample_draft("Ana Souza", "123.456.789-01", "ana@example.com").to_payload())
        .unwrap();

    let mut app = idle_app();
    app.clients = api.list(None).unwrap();
    app.modal = Some(ModalState::DeleteConfirm {
        id: created.id,
        name: created.name.clone(),
        selected: 0,
    });
    app.input_mode = InputMode::Modal;

    perform_pending_action(&mut app, &api, PendingAction::Delete { id: created.id });

    assert!(app.modal.is_none());
    assert_eq!(app.pending, Some(PendingAction::Refresh));
    let action = app.pending.take().unwrap();
    perform_pending_action(&mut app, &api, action);
    assert!(app.clients.is_empty());
    assert_eq!(app.selected_index, 0);
}

#[test]
fn refresh_uses_the_current_search_term() {
    let base = start_server();
    let api = client_for(&base);
    wait_ready(&api);

    api.create(&sample_draft("Ana Souza", "111.222.333-44", "ana@example.com").to_payload())
        .unwrap();
    api.create(&sample_draft("Bruno Costa", "555.666.777-88", "bruno@example.com").to_payload())
        .unwrap();

    let mut app = idle_app();
    app.search_query = "bruno".to_string();
    perform_pending_action(&mut app, &api, PendingAction::Refresh);

    assert_eq!(app.clients.len(), 1);
    assert_eq!(app.clients[0].name, "Bruno Costa");
}

#[test]
fn transport_failure_surfaces_as_info_modal() {
    // bind and drop a listener so nothing is listening on the port
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let api = client_for(&format!("http://127.0.0.1:{port}"));

    let mut app = idle_app();
    perform_pending_action(&mut app, &api, PendingAction::Refresh);

    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    assert_eq!(app.input_mode, InputMode::Modal);
    assert!(!app.loading);
}
