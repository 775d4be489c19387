use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode as AxumStatus,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    results_status: AxumStatus,
    votes: Arc<Mutex<Vec<String>>>,
}

async fn handle_results(State(state): State<ServerState>) -> impl IntoResponse {
    if !state.results_status.is_success() {
        return (state.results_status, "unavailable").into_response();
    }
    Json(serde_json::json!({ "option_a": 3, "option_b": 5, "option_c": 1 })).into_response()
}

async fn handle_vote(
    State(state): State<ServerState>,
    Path(option): Path<String>,
) -> impl IntoResponse {
    if !["option_a", "option_b", "option_c"].contains(&option.as_str()) {
        return (AxumStatus::NOT_FOUND, "Invalid option").into_response();
    }
    state.votes.lock().await.push(option.clone());
    Json(serde_json::json!({ "message": format!("Voted for {option}!") })).into_response()
}

async fn handle_root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Voting App API" }))
}

async fn spawn_vote_server(results_status: AxumStatus) -> (String, Arc<Mutex<Vec<String>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let votes = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        results_status,
        votes: Arc::clone(&votes),
    };
    let app = Router::new()
        .route("/", get(handle_root))
        .route("/results", get(handle_results))
        .route("/vote/:option", post(handle_vote))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), votes)
}

fn backend_for(base_url: &str) -> HttpResultsBackend {
    HttpResultsBackend::new(base_url, Duration::from_secs(5)).expect("backend")
}

#[tokio::test]
async fn fetches_results_snapshot() {
    let (base_url, _votes) = spawn_vote_server(AxumStatus::OK).await;
    let backend = backend_for(&base_url);

    let snapshot = backend.fetch_results().await.expect("results");

    assert_eq!(snapshot, ResultsSnapshot::new(3, 5, 1));
}

#[tokio::test]
async fn non_success_results_status_is_reported() {
    let (base_url, _votes) = spawn_vote_server(AxumStatus::SERVICE_UNAVAILABLE).await;
    let backend = backend_for(&base_url);

    let err = backend.fetch_results().await.expect_err("must fail");

    assert!(matches!(err, BackendError::ResultsUnavailable { .. }));
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.to_string(), "Failed to fetch results.");
}

#[tokio::test]
async fn vote_posts_option_as_path_segment() {
    let (base_url, votes) = spawn_vote_server(AxumStatus::OK).await;
    let backend = backend_for(&format!("{base_url}/"));

    backend
        .submit_vote(VoteOption::OptionB)
        .await
        .expect("vote");
    backend
        .submit_vote(VoteOption::OptionC)
        .await
        .expect("vote");

    assert_eq!(*votes.lock().await, vec!["option_b", "option_c"]);
}

#[tokio::test]
async fn rejected_vote_maps_to_vote_error() {
    let (base_url, votes) = spawn_vote_server(AxumStatus::OK).await;
    let backend = backend_for(&format!("{base_url}/nested"));

    let err = backend
        .submit_vote(VoteOption::OptionA)
        .await
        .expect_err("unknown route must fail");

    assert!(matches!(err, BackendError::VoteRejected { .. }));
    assert_eq!(err.to_string(), "Vote failed to submit.");
    assert!(votes.lock().await.is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let backend = backend_for(&format!("http://{addr}"));

    let err = backend.fetch_results().await.expect_err("must fail");

    assert!(matches!(err, BackendError::Transport(_)));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn reads_api_banner() {
    let (base_url, _votes) = spawn_vote_server(AxumStatus::OK).await;
    let backend = backend_for(&base_url);

    let banner = backend.api_banner().await.expect("banner");

    assert_eq!(banner.message, "Voting App API");
}

#[tokio::test]
async fn drives_controller_end_to_end() {
    let (base_url, votes) = spawn_vote_server(AxumStatus::OK).await;
    let backend = Arc::new(backend_for(&base_url));
    let controller = crate::controller::PollVoteController::new(backend);

    let outcome = controller.cast_vote(VoteOption::OptionA).await;

    assert_eq!(outcome, crate::controller::VoteOutcome::Submitted);
    assert_eq!(*votes.lock().await, vec!["option_a"]);
    assert_eq!(
        controller.view().results,
        Some(ResultsSnapshot::new(3, 5, 1))
    );
}

/// Serves one canned snapshot, then forwards reads to a real HTTP backend.
struct PrimedBackend {
    first: Mutex<Option<ResultsSnapshot>>,
    http: HttpResultsBackend,
}

#[async_trait]
impl ResultsBackend for PrimedBackend {
    async fn fetch_results(&self) -> Result<ResultsSnapshot, BackendError> {
        if let Some(snapshot) = self.first.lock().await.take() {
            return Ok(snapshot);
        }
        self.http.fetch_results().await
    }

    async fn submit_vote(&self, option: VoteOption) -> Result<(), BackendError> {
        self.http.submit_vote(option).await
    }
}

#[tokio::test]
async fn controller_keeps_counts_when_backend_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let backend = Arc::new(PrimedBackend {
        first: Mutex::new(Some(ResultsSnapshot::new(3, 5, 1))),
        http: backend_for(&format!("http://{addr}")),
    });
    let controller = crate::controller::PollVoteController::new(backend);

    assert_eq!(
        controller.fetch_results().await,
        crate::controller::FetchOutcome::Applied
    );
    assert_eq!(
        controller.fetch_results().await,
        crate::controller::FetchOutcome::Failed
    );

    let view = controller.view();
    assert_eq!(view.results, Some(ResultsSnapshot::new(3, 5, 1)));
    assert!(view.status.is_error());
}

#[test]
fn base_url_must_be_absolute_http() {
    assert_eq!(
        normalize_base_url("http://vote-app-service/").expect("valid"),
        "http://vote-app-service"
    );
    assert_eq!(
        normalize_base_url(" https://example.test/api ").expect("valid"),
        "https://example.test/api"
    );
    assert!(normalize_base_url("/api").is_err());
    assert!(normalize_base_url("ftp://example.test").is_err());
    assert!(normalize_base_url("http://example.test/?x=1").is_err());
}
