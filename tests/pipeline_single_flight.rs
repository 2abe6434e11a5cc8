// std
use std::{
	io::{Error as IoError, ErrorKind},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use tokio::sync::Barrier;
// self
use roadwatch_client::{
	auth::{TokenPair, UserProfile, UserRole},
	config::ClientConfig,
	error::Error,
	http::{ApiHttpClient, HttpFuture, HttpRequest, HttpResponse},
	pipeline::{ApiClient, ApiRequest, RefreshMetrics},
	store::{MemoryStore, SessionKey, SessionStore},
};

const CALLERS: usize = 8;

/// Backend that holds every stale request at a barrier and only answers the refresh once all
/// other callers have joined the pending flight.
struct GatedBackend {
	gate: Barrier,
	metrics: Arc<RefreshMetrics>,
	refresh_status: u16,
	refresh_calls: AtomicUsize,
	protected_calls: AtomicUsize,
}
impl GatedBackend {
	fn new(metrics: Arc<RefreshMetrics>, refresh_status: u16) -> Self {
		Self {
			gate: Barrier::new(CALLERS),
			metrics,
			refresh_status,
			refresh_calls: AtomicUsize::new(0),
			protected_calls: AtomicUsize::new(0),
		}
	}

	async fn answer_refresh(&self, request: &HttpRequest) -> Result<HttpResponse, IoError> {
		self.refresh_calls.fetch_add(1, Ordering::SeqCst);

		assert!(request.header("authorization").is_none(), "Refresh must not carry a bearer.");

		let followers = (CALLERS - 1) as u64;

		tokio::time::timeout(StdDuration::from_secs(5), async {
			while self.metrics.joined() < followers {
				tokio::time::sleep(StdDuration::from_millis(5)).await;
			}
		})
		.await
		.map_err(|_| IoError::new(ErrorKind::TimedOut, "Followers never joined the refresh."))?;

		let body = if self.refresh_status == 200 {
			r#"{"access_token":"tok2","token_type":"Bearer","expires_in":900}"#
		} else {
			r#"{"error":"invalid_refresh_token"}"#
		};

		Ok(HttpResponse::new(self.refresh_status, body))
	}
}
impl ApiHttpClient for GatedBackend {
	type TransportError = IoError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			if request.url.path().ends_with("/auth/refresh") {
				return self.answer_refresh(&request).await;
			}

			self.protected_calls.fetch_add(1, Ordering::SeqCst);

			match request.header("authorization") {
				Some("Bearer tok1") => {
					self.gate.wait().await;

					Ok(HttpResponse::new(401, Vec::new()))
				},
				Some("Bearer tok2") => Ok(HttpResponse::new(200, r#"{"ok":true}"#)),
				_ => Ok(HttpResponse::new(401, Vec::new())),
			}
		})
	}
}

async fn gated_client(
	refresh_status: u16,
) -> (ApiClient<GatedBackend>, Arc<GatedBackend>, MemoryStore) {
	let metrics = Arc::new(RefreshMetrics::default());
	let backend = Arc::new(GatedBackend::new(metrics.clone(), refresh_status));
	let config = ClientConfig::builder()
		.base_url("http://backend.invalid/api/v1")
		.build()
		.expect("Static base URL should form a valid config.");
	let memory = MemoryStore::default();
	let store: Arc<dyn SessionStore> = Arc::new(memory.clone());
	let mut client: ApiClient<GatedBackend> =
		ApiClient::with_http_client(config, store, backend.clone());

	client.refresh_metrics = metrics;
	client
		.session
		.save_login(
			&TokenPair::new("tok1", "ref1"),
			&UserProfile {
				id: "u-1".into(),
				name: "Sari".into(),
				email: "sari@example.com".into(),
				role: UserRole::Verificator,
				created_at: time::macros::datetime!(2025-03-01 08:00 UTC),
				last_login: None,
			},
		)
		.await
		.expect("Seeding the session should succeed.");

	(client, backend, memory)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_callers_coalesce_onto_one_refresh() {
	let (client, backend, memory) = gated_client(200).await;
	let handles = (0..CALLERS)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move { client.dispatch(ApiRequest::get("/damaged-roads")).await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let response = handle
			.await
			.expect("Caller task should not panic.")
			.expect("Every caller should succeed after the shared refresh.");

		assert_eq!(response.status, 200);
	}

	assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
	assert_eq!(backend.protected_calls.load(Ordering::SeqCst), CALLERS * 2);
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.joined(), (CALLERS - 1) as u64);
	assert_eq!(memory.peek(SessionKey::AccessToken).as_deref(), Some("tok2"));
	assert_eq!(memory.peek(SessionKey::RefreshToken).as_deref(), Some("ref1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_refresh_is_shared_by_every_waiter() {
	let (client, backend, memory) = gated_client(401).await;
	let logouts = Arc::new(AtomicUsize::new(0));
	let client = {
		let logouts = logouts.clone();

		client.with_logout_hook(move |_| {
			logouts.fetch_add(1, Ordering::SeqCst);
		})
	};
	let handles = (0..CALLERS)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move { client.dispatch(ApiRequest::get("/damaged-roads")).await })
		})
		.collect::<Vec<_>>();
	let mut causes = Vec::with_capacity(CALLERS);

	for handle in handles {
		let err = handle
			.await
			.expect("Caller task should not panic.")
			.expect_err("Every caller should observe the failed refresh.");

		match err {
			Error::SessionExpired { cause } => causes.push(cause),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	assert!(causes.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
	assert!(matches!(causes[0].as_ref(), Error::Api { status: 401, .. }));
	assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
	assert_eq!(backend.protected_calls.load(Ordering::SeqCst), CALLERS);
	assert_eq!(logouts.load(Ordering::SeqCst), 1);
	assert!(memory.is_empty());
	assert!(!client.is_authenticated().await.expect("Lookup should succeed."));
}
