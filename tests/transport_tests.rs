//! Integration tests for the transport adapters, driven by in-memory fakes
//! of the capability traits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use effectkit::config::TransportConfig;
use effectkit::data::Unit;
use effectkit::effect::{CancellationToken, TaskResult};
use effectkit::transport::{
    BufferedResponse, CHANNEL_ALREADY_COMPLETED, CHANNEL_WRITE_CANCELLED, ChannelSink, DbConnection,
    DbTransaction, DbTransactionState, HTTP_PAYLOAD_EMPTY, HTTP_REQUEST_CANCELLED, HttpMethod,
    HttpRequest, HttpResponse, HttpTransport, IsolationLevel, NO_ACTIVE_TRANSACTION, TransportError,
    WritableSink, commit_transaction, complete_result, get_json_result, http_reader,
    post_json_result, rollback_transaction, send_result, to_state_task_result,
    to_state_task_result_with, write_reader, write_result,
};
use parking_lot::Mutex;
use rstest::rstest;
use serde::{Deserialize, Serialize};

// =============================================================================
// Fakes
// =============================================================================

struct FailingSink(&'static str);

impl WritableSink<i32> for FailingSink {
    fn try_write(&self, _item: i32) -> bool {
        false
    }

    async fn write(&self, _item: i32, _cancellation: &CancellationToken) -> Result<(), TransportError> {
        Err(TransportError::failed(self.0))
    }

    fn complete(&self, _error: Option<String>) -> bool {
        true
    }
}

type Handler = dyn Fn(&HttpRequest) -> Result<BufferedResponse, TransportError> + Send + Sync;

struct FakeHttp {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeHttp {
    fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<BufferedResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn responding(status: u16, body: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(BufferedResponse::new(status, body)))
    }
}

impl HttpTransport for FakeHttp {
    type Response = BufferedResponse;

    async fn send(
        &self,
        request: HttpRequest,
        cancellation: &CancellationToken,
    ) -> Result<BufferedResponse, TransportError> {
        cancellation.check()?;
        let response = (self.handler)(&request);
        self.requests.lock().push(request);
        response
    }
}

/// A response whose body read observes the token.
struct SlowBody;

impl HttpResponse for SlowBody {
    fn status(&self) -> u16 {
        200
    }

    async fn read_body(self, cancellation: &CancellationToken) -> Result<String, TransportError> {
        cancellation.run_until_cancelled(std::future::pending::<()>()).await?;
        Ok(String::new())
    }
}

struct SlowHttp;

impl HttpTransport for SlowHttp {
    type Response = SlowBody;

    async fn send(&self, _request: HttpRequest, _cancellation: &CancellationToken) -> Result<SlowBody, TransportError> {
        Ok(SlowBody)
    }
}

#[derive(Debug, Default)]
struct StubTransaction {
    fail_commit: bool,
    fail_rollback: bool,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    disposals: AtomicUsize,
}

impl StubTransaction {
    fn failing_commit() -> Self {
        Self { fail_commit: true, ..Self::default() }
    }

    fn failing_rollback() -> Self {
        Self { fail_rollback: true, ..Self::default() }
    }

    fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl DbTransaction for StubTransaction {
    async fn commit(&self) -> Result<(), TransportError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.fail_commit { Err(TransportError::failed("Commit failure")) } else { Ok(()) }
    }

    async fn rollback(&self) -> Result<(), TransportError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        if self.fail_rollback { Err(TransportError::failed("Rollback failure")) } else { Ok(()) }
    }

    async fn dispose(&self) -> Result<(), TransportError> {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StubConnection {
    open: AtomicBool,
    open_calls: AtomicUsize,
    began: Mutex<Vec<IsolationLevel>>,
}

impl DbConnection for StubConnection {
    type Transaction = StubTransaction;

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn open(&self) -> Result<(), TransportError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn begin_transaction(&self, isolation_level: IsolationLevel) -> Result<StubTransaction, TransportError> {
        self.began.lock().push(isolation_level);
        Ok(StubTransaction::default())
    }
}

type State = DbTransactionState<StubTransaction>;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Payload {
    value: i32,
}

// =============================================================================
// Channel
// =============================================================================

#[rstest]
#[tokio::test]
async fn channel_write_results_cover_every_branch() {
    let (sink, mut receiver) = ChannelSink::channel(8);
    let sink = Arc::new(sink);

    assert_eq!(write_result(Arc::clone(&sink), 1, CancellationToken::none()).await, Ok(Unit));
    assert_eq!(receiver.recv().await, Some(1));

    let cancelled = write_result(Arc::clone(&sink), 2, CancellationToken::cancelled_token()).await;
    assert_eq!(cancelled, Err(CHANNEL_WRITE_CANCELLED.to_string()));

    let failing = write_result(Arc::new(FailingSink("boom")), 3, CancellationToken::none()).await;
    assert_eq!(failing, Err("boom".to_string()));

    assert_eq!(complete_result(Arc::clone(&sink), None).await, Ok(Unit));
    assert_eq!(
        complete_result(Arc::clone(&sink), None).await,
        Err(CHANNEL_ALREADY_COMPLETED.to_string())
    );
}

#[rstest]
#[tokio::test]
async fn channel_reader_writes_to_supplied_sink() {
    let (sink, mut receiver) = ChannelSink::channel(1);
    let outcome = write_reader(5).run(Arc::new(sink)).await;
    assert_eq!(outcome, Ok(Unit));
    assert_eq!(receiver.recv().await, Some(5));
}

// =============================================================================
// HTTP
// =============================================================================

#[rstest]
#[tokio::test]
async fn http_results_handle_each_scenario() {
    let client = FakeHttp::responding(200, r#"{"value":5}"#);

    let sent = send_result(Arc::clone(&client), HttpRequest::get("https://example.com"), CancellationToken::none()).await;
    assert_eq!(sent.map(|response| response.status()), Ok(200));

    let fetched: Result<Payload, String> =
        get_json_result(Arc::clone(&client), "https://example.com", CancellationToken::none()).await;
    assert_eq!(fetched, Ok(Payload { value: 5 }));

    let posted: Result<Payload, String> = post_json_result(
        Arc::clone(&client),
        "https://example.com",
        &Payload { value: 10 },
        CancellationToken::none(),
    )
    .await;
    assert_eq!(posted, Ok(Payload { value: 5 }));

    let requests = client.requests.lock();
    let post = requests.last().expect("post recorded");
    assert_eq!(post.method(), HttpMethod::Post);
    assert_eq!(post.header("content-type"), Some("application/json"));
    let sent_body: serde_json::Value = serde_json::from_slice(post.body().expect("post body")).expect("json body");
    assert_eq!(sent_body, serde_json::json!({ "value": 10 }));
}

#[rstest]
#[case(500, "boom", "HTTP request failed with status 500: boom")]
#[case(404, "", "HTTP request failed with status 404: ")]
#[tokio::test]
async fn failure_status_includes_body(#[case] status: u16, #[case] body: &'static str, #[case] expected: &str) {
    let outcome = send_result(
        FakeHttp::responding(status, body),
        HttpRequest::get("https://example.com"),
        CancellationToken::none(),
    )
    .await;
    assert_eq!(outcome.map(|response| response.status()), Err(expected.to_string()));
}

#[rstest]
#[tokio::test]
async fn cancellation_and_transport_errors_become_failures() {
    let cancelled = send_result(
        FakeHttp::responding(200, "{}"),
        HttpRequest::get("https://example.com"),
        CancellationToken::cancelled_token(),
    )
    .await;
    assert_eq!(cancelled.map(|response| response.status()), Err(HTTP_REQUEST_CANCELLED.to_string()));

    let refused = FakeHttp::new(|_| Err(TransportError::failed("connection refused")));
    let outcome = send_result(refused, HttpRequest::get("https://example.com"), CancellationToken::none()).await;
    assert_eq!(outcome.map(|response| response.status()), Err("connection refused".to_string()));

    let cancelled_inside = FakeHttp::new(|_| Err(TransportError::Cancelled));
    let outcome = send_result(cancelled_inside, HttpRequest::get("https://example.com"), CancellationToken::none()).await;
    assert_eq!(outcome.map(|response| response.status()), Err(HTTP_REQUEST_CANCELLED.to_string()));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancelled_body_read_fails_with_cancel_message() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        canceller.cancel();
    });
    let outcome: Result<Payload, String> = get_json_result(Arc::new(SlowHttp), "https://example.com", token).await;
    assert_eq!(outcome, Err(HTTP_REQUEST_CANCELLED.to_string()));
}

#[rstest]
#[case("null", HTTP_PAYLOAD_EMPTY)]
#[case("   ", HTTP_PAYLOAD_EMPTY)]
#[case("{invalid", "key must be a string at line 1 column 2")]
#[tokio::test]
async fn unusable_payloads_fail(#[case] body: &'static str, #[case] expected: &str) {
    let outcome: Result<Payload, String> =
        get_json_result(FakeHttp::responding(200, body), "https://example.com", CancellationToken::none()).await;
    assert_eq!(outcome, Err(expected.to_string()));
}

#[rstest]
#[tokio::test]
async fn http_reader_runs_against_client() {
    let reader = http_reader(|client: Arc<FakeHttp>| -> TaskResult<Payload> {
        get_json_result(client, "https://example.com", CancellationToken::none())
    });
    let outcome = reader.run(FakeHttp::responding(200, r#"{"value":7}"#)).await;
    assert_eq!(outcome, Ok(Payload { value: 7 }));
}

// =============================================================================
// Database
// =============================================================================

#[rstest]
#[tokio::test]
async fn state_task_result_begins_and_reuses_transactions() {
    let connection = Arc::new(StubConnection::default());
    let effect = to_state_task_result(
        Arc::clone(&connection),
        |connection: Arc<StubConnection>, _transaction, _cancellation| async move {
            Ok(i32::from(connection.is_open()))
        },
        true,
    );

    let (value, state) = effect.run(State::empty()).await.expect("first run");
    assert_eq!(value, 1);
    assert!(state.has_transaction());
    assert!(state.owns_transaction());
    assert_eq!(connection.open_calls.load(Ordering::SeqCst), 1);

    let (_, reused) = effect.run(state.clone()).await.expect("second run");
    assert_eq!(reused, state);
    assert_eq!(connection.began.lock().len(), 1);

    let borrowed = State::borrowed(Arc::new(StubTransaction::default()));
    let (_, kept) = effect.run(borrowed.clone()).await.expect("borrowed run");
    assert_eq!(kept, borrowed);
}

#[rstest]
#[tokio::test]
async fn missing_transaction_fails_when_not_allowed() {
    let effect = to_state_task_result(
        Arc::new(StubConnection::default()),
        |_, _, _| async { Ok(0) },
        false,
    );
    assert_eq!(effect.run(State::empty()).await, Err(NO_ACTIVE_TRANSACTION.to_string()));
}

#[rstest]
#[tokio::test]
async fn configured_isolation_level_is_requested() {
    let connection = Arc::new(StubConnection::default());
    let config = TransportConfig {
        isolation_level: IsolationLevel::Serializable,
        ..TransportConfig::default()
    };
    let effect = to_state_task_result_with(
        Arc::clone(&connection),
        |_, _, cancellation: CancellationToken| async move { Ok(cancellation.is_cancelled()) },
        &config,
        CancellationToken::none(),
    );
    assert_eq!(effect.eval(State::empty()).await, Ok(false));
    assert_eq!(*connection.began.lock(), vec![IsolationLevel::Serializable]);
}

#[rstest]
#[tokio::test]
async fn failed_action_rolls_back_and_disposes_owned_transaction() {
    let transaction = Arc::new(StubTransaction::failing_rollback());
    let effect = to_state_task_result(
        Arc::new(StubConnection::default()),
        |_, _, _| async { Err::<i32, _>("boom".to_string()) },
        true,
    );
    let outcome = effect.run(State::owned(Arc::clone(&transaction))).await;
    assert_eq!(outcome.map(|(value, _)| value), Err("boom".to_string()));
    assert_eq!(StubTransaction::count(&transaction.rollbacks), 1);
    assert_eq!(StubTransaction::count(&transaction.disposals), 1);

    let panicking = to_state_task_result(
        Arc::new(StubConnection::default()),
        |_, _, _| -> std::future::Ready<Result<i32, String>> { panic!("exploded") },
        true,
    );
    let borrowed = Arc::new(StubTransaction::default());
    let outcome = panicking.run(State::borrowed(Arc::clone(&borrowed))).await;
    assert_eq!(outcome.map(|(value, _)| value), Err("exploded".to_string()));
    assert_eq!(StubTransaction::count(&borrowed.rollbacks), 0);
}

#[rstest]
#[tokio::test]
async fn commit_finishes_owned_transactions_only() {
    let transaction = Arc::new(StubTransaction::default());
    let committed = commit_transaction(true).run(State::owned(Arc::clone(&transaction))).await;
    assert_eq!(committed, Ok((Unit, State::empty())));
    assert_eq!(StubTransaction::count(&transaction.commits), 1);
    assert_eq!(StubTransaction::count(&transaction.disposals), 1);

    let not_owned = State::borrowed(Arc::clone(&transaction));
    let skipped = commit_transaction(true).run(not_owned.clone()).await;
    assert_eq!(skipped, Ok((Unit, not_owned)));
    assert_eq!(StubTransaction::count(&transaction.commits), 1);

    assert_eq!(commit_transaction(true).run(State::empty()).await, Ok((Unit, State::empty())));

    let failing = Arc::new(StubTransaction::failing_commit());
    let failure = commit_transaction(true).run(State::owned(failing)).await;
    assert_eq!(failure, Err("Commit failure".to_string()));

    let kept_open = Arc::new(StubTransaction::default());
    let outcome = commit_transaction(false).run(State::owned(Arc::clone(&kept_open))).await;
    assert!(outcome.is_ok());
    assert_eq!(StubTransaction::count(&kept_open.disposals), 0);
}

#[rstest]
#[tokio::test]
async fn rollback_mirrors_commit() {
    let transaction = Arc::new(StubTransaction::default());
    let rolled_back = rollback_transaction(true).run(State::owned(Arc::clone(&transaction))).await;
    assert_eq!(rolled_back, Ok((Unit, State::empty())));
    assert_eq!(StubTransaction::count(&transaction.rollbacks), 1);
    assert_eq!(StubTransaction::count(&transaction.disposals), 1);

    assert!(rollback_transaction::<StubTransaction>(true).run(State::empty()).await.is_ok());

    let failing = Arc::new(StubTransaction::failing_rollback());
    let failure = rollback_transaction(true).run(State::owned(failing)).await;
    assert_eq!(failure, Err("Rollback failure".to_string()));

    let not_owned = State::borrowed(transaction);
    let skipped = rollback_transaction(true).run(not_owned.clone()).await;
    assert_eq!(skipped, Ok((Unit, not_owned)));
}

#[rstest]
#[tokio::test]
async fn steps_compose_into_a_unit_of_work() {
    let connection = Arc::new(StubConnection::default());
    let insert = to_state_task_result(
        Arc::clone(&connection),
        |_, _, _| async { Ok(41) },
        true,
    );
    let unit_of_work = insert
        .fmap(|rows| rows + 1)
        .flat_map(move |rows| commit_transaction(true).fmap(move |_| rows));
    let (rows, state) = unit_of_work.run(State::empty()).await.expect("unit of work");
    assert_eq!(rows, 42);
    assert_eq!(state, State::empty());
}
