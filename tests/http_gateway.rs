//! HTTP gateway tests against a stub task service.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use gigbounty::task::{
    adapters::http::{HttpTaskGateway, WALLET_HEADER},
    domain::{Amount, DisputeReason, TaskDraft, TaskId, TaskStatus, TxId, Verdict, WalletAddress},
    ports::{CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayError},
    services::ErrorKind,
};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const POSTER: &str = "POSTERWALLETADDRESS";
const ACCEPTOR: &str = "ACCEPTORWALLETADDRESS";

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    wallet: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubState {
    fn record(&self, path: &str, headers: &HeaderMap, body: Value) {
        let wallet = headers
            .get(WALLET_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.requests.lock().expect("requests lock").push(Recorded {
            path: path.to_owned(),
            wallet,
            body,
        });
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn task_json(id: &str, status: &str, worker: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": "Landing page copy",
        "description": "Write copy for the landing page",
        "amount": 12.5,
        "creator_wallet": POSTER,
        "worker_wallet": worker,
        "status": status,
        "proof_url": null,
        "deadline": "2026-12-31",
        "created_at": "2026-10-01T09:30:00Z",
        "tx_id": "TX-FUND"
    })
}

async fn list_tasks(State(state): State<StubState>, headers: HeaderMap) -> Json<Value> {
    state.record("/tasks", &headers, Value::Null);
    Json(json!([task_json("7", "OPEN", None), task_json("8", "COMPLETED", Some(ACCEPTOR))]))
}

async fn get_task(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Task not found" })));
    }
    (StatusCode::OK, Json(task_json(&id, "OPEN", None)))
}

async fn create_task(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("/task/create", &headers, body.clone());
    let mut created = task_json("9", "OPEN", None);
    if let Some(fields) = created.as_object_mut() {
        fields.insert("title".to_owned(), body.get("title").cloned().unwrap_or(Value::Null));
        fields.insert("tx_id".to_owned(), body.get("tx_id").cloned().unwrap_or(Value::Null));
    }
    Json(created)
}

async fn claim(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("/task/claim", &headers, body.clone());
    let id = body.get("task_id").and_then(Value::as_str).unwrap_or_default().to_owned();
    Json(task_json(&id, "CLAIMED", body.get("worker_wallet").and_then(Value::as_str)))
}

async fn approve(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("/task/approve", &headers, body);
    (
        StatusCode::CONFLICT,
        Json(json!({ "detail": "Task is not in SUBMITTED state" })),
    )
}

async fn dispute(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.record("/task/dispute", &headers, body);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned())
}

async fn ai_verify(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "task_id": body.get("task_id"),
        "ai_result": { "score": 0.82, "verdict": "PASS", "reasoning": "Proof matches" },
        "audit_report": "Checked the linked pull request"
    }))
}

async fn escrow_info() -> Json<Value> {
    Json(json!({
        "address": "ESCROWADDRESS",
        "balance": 100.0,
        "fee_percent": 2.5,
        "configured": true
    }))
}

async fn spawn_stub() -> (HttpTaskGateway, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id", get(get_task))
        .route("/task/create", post(create_task))
        .route("/task/claim", post(claim))
        .route("/task/approve", post(approve))
        .route("/task/dispute", post(dispute))
        .route("/task/ai-verify", post(ai_verify))
        .route("/escrow/info", get(escrow_info))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    let gateway =
        HttpTaskGateway::new(&format!("http://{addr}/"), None).expect("build HTTP gateway");
    (gateway, state)
}

fn wallet(value: &str) -> WalletAddress {
    WalletAddress::new(value).expect("valid wallet")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lists_tasks_with_the_caller_header() {
    let (gateway, state) = spawn_stub().await;

    let tasks = gateway
        .list_tasks(Some(&wallet(ACCEPTOR)))
        .await
        .expect("list tasks");

    assert_eq!(gateway.mode(), GatewayMode::Remote);
    assert!(!gateway.base_url().ends_with('/'));
    let statuses: Vec<TaskStatus> = tasks.iter().map(|task| task.status()).collect();
    assert_eq!(statuses, [TaskStatus::Open, TaskStatus::Completed]);
    assert_eq!(tasks.first().map(|task| task.amount()), Some(Amount::from_micro(12_500_000)));
    let recorded = state.requests();
    assert_eq!(
        recorded.first().and_then(|request| request.wallet.clone()),
        Some(ACCEPTOR.to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_maps_to_not_found() {
    let (gateway, _state) = spawn_stub().await;

    let result = gateway.get_task(&TaskId::new("missing"), None).await;

    assert!(matches!(result, Err(TaskGatewayError::NotFound(id)) if id.as_str() == "missing"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claim_sends_snake_case_body() {
    let (gateway, state) = spawn_stub().await;

    let claimed = gateway
        .claim(&TaskId::new("7"), &wallet(ACCEPTOR))
        .await
        .expect("claim");

    assert_eq!(claimed.status(), TaskStatus::Claimed);
    assert_eq!(claimed.worker(), Some(&wallet(ACCEPTOR)));
    let recorded = state.requests();
    let request = recorded.last().expect("claim recorded");
    assert_eq!(request.path, "/task/claim");
    assert_eq!(request.wallet.as_deref(), Some(ACCEPTOR));
    assert_eq!(
        request.body,
        json!({ "task_id": "7", "worker_wallet": ACCEPTOR })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_carries_the_funding_transaction() {
    let (gateway, state) = spawn_stub().await;
    let command = CreateTaskCommand {
        draft: TaskDraft::parse("Logo", "Design a logo", "2.5", Some("2026-12-31"))
            .expect("valid draft"),
        creator: wallet(POSTER),
        tx_id: Some(TxId::new("TX-42")),
    };

    let created = gateway.create_task(&command).await.expect("create");

    assert_eq!(created.title(), "Logo");
    assert_eq!(created.tx_id(), Some(&TxId::new("TX-42")));
    let recorded = state.requests();
    let body = &recorded.last().expect("create recorded").body;
    assert_eq!(body.get("creator_wallet"), Some(&json!(POSTER)));
    assert_eq!(body.get("deadline"), Some(&json!("2026-12-31")));
    assert_eq!(body.get("tx_id"), Some(&json!("TX-42")));
    assert_eq!(body.get("amount"), Some(&json!(2.5)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conflict_surfaces_the_service_detail() {
    let (gateway, _state) = spawn_stub().await;

    let result = gateway.approve(&TaskId::new("7"), &wallet(POSTER)).await;

    let error = result.expect_err("approve should be rejected");
    assert!(matches!(
        &error,
        TaskGatewayError::Rejected { status: 409, detail } if detail == "Task is not in SUBMITTED state"
    ));
    assert_eq!(error.kind(), ErrorKind::InvalidState);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_errors_without_detail_get_a_generic_message() {
    let (gateway, _state) = spawn_stub().await;
    let reason = DisputeReason::new("Work never delivered").expect("valid reason");

    let result = gateway
        .dispute(&TaskId::new("7"), &wallet(POSTER), &reason)
        .await;

    let error = result.expect_err("dispute should fail");
    assert!(matches!(
        &error,
        TaskGatewayError::Rejected { status: 500, detail } if detail.starts_with("Request failed: 500")
    ));
    assert_eq!(error.kind(), ErrorKind::Transport);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn decodes_ai_verification() {
    let (gateway, _state) = spawn_stub().await;

    let verification = gateway
        .ai_verify(&TaskId::new("7"), None)
        .await
        .expect("ai verify");

    assert_eq!(verification.task_id, TaskId::new("7"));
    assert_eq!(verification.verdict, Verdict::Pass);
    assert_eq!(verification.reasoning.as_deref(), Some("Proof matches"));
    assert_eq!(
        verification.report.as_deref(),
        Some("Checked the linked pull request")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reads_escrow_details() {
    let (gateway, _state) = spawn_stub().await;

    let escrow = gateway.escrow_info().await.expect("escrow info");

    assert!(escrow.configured);
    assert_eq!(escrow.deposit_address(), Some(&wallet("ESCROWADDRESS")));
    assert_eq!(escrow.balance, Some(Amount::from_whole(100)));
}
