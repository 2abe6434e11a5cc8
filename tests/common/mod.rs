#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
use time::{Duration, macros};
// self
use roadwatch_client::{
	auth::{TokenPair, UserProfile, UserRole},
	config::{ClientConfig, ClientConfigBuilder},
	pipeline::ReqwestApiClient,
	store::{MemoryStore, SessionStore},
};

pub const PROFILE_JSON: &str = r#"{"id":"u-1","name":"Sari","email":"sari@example.com","role":"user","created_at":"2025-03-01T08:00:00Z"}"#;

pub fn profile() -> UserProfile {
	UserProfile {
		id: "u-1".into(),
		name: "Sari".into(),
		email: "sari@example.com".into(),
		role: UserRole::User,
		created_at: macros::datetime!(2025-03-01 08:00 UTC),
		last_login: None,
	}
}

/// Builds a reqwest-backed client pointed at the mock server's `/api/v1` root.
pub fn build_client(server: &MockServer) -> (ReqwestApiClient, MemoryStore) {
	build_client_with(ClientConfig::builder().base_url(server.url("/api/v1")))
}

/// Same as [`build_client`] with a custom refresh deadline.
pub fn build_client_with_refresh_timeout(
	server: &MockServer,
	timeout: Duration,
) -> (ReqwestApiClient, MemoryStore) {
	build_client_with(ClientConfig::builder().base_url(server.url("/api/v1")).refresh_timeout(timeout))
}

fn build_client_with(builder: ClientConfigBuilder) -> (ReqwestApiClient, MemoryStore) {
	let config = builder.build().expect("Mock server URL should form a valid config.");
	let backend = MemoryStore::default();
	let store: Arc<dyn SessionStore> = Arc::new(backend.clone());

	(ReqwestApiClient::new(config, store), backend)
}

pub async fn seed_session(client: &ReqwestApiClient, access: &str, refresh: &str) {
	client
		.session
		.save_login(&TokenPair::new(access, refresh), &profile())
		.await
		.expect("Seeding the session should succeed.");
}
