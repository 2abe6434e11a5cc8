//! Demonstrates transparent session recovery: the stored access token has expired, the client
//! refreshes it once, and the original request succeeds on the retry.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use roadwatch_client::{
	api::{ListReportsQuery, LoginRequest, ReportStatus},
	config::ClientConfig,
	http::ReqwestHttpClient,
	pipeline::ApiClient,
	reqwest::Client,
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"expired","refresh_token":"demo-refresh","token_type":"Bearer","expires_in":0,"user":{"id":"u-1","name":"Demo","email":"demo@example.com","role":"verificator","created_at":"2025-03-01T08:00:00Z"}}"#,
			);
		})
		.await;
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/damaged-roads").header("authorization", "Bearer expired");
			then.status(401).header("content-type", "application/json").body(r#"{"error":"token_expired"}"#);
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"fresh","token_type":"Bearer","expires_in":900}"#);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/damaged-roads").header("authorization", "Bearer fresh");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[],"pagination":{"page":1,"limit":10,"offset":0,"total":0}}"#,
			);
		})
		.await;
	let config = ClientConfig::builder().base_url(server.url("/api/v1")).build()?;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let client = <ApiClient<ReqwestHttpClient>>::with_http_client(config, store, http_client)
		.with_logout_hook(|cause| eprintln!("Signed out: {cause}."));
	let session = client
		.login(&LoginRequest { email: "demo@example.com".into(), password: "demo".into() })
		.await?;

	println!("Signed in as {} ({}).", session.user.name, session.user.role);

	let page = client
		.list_reports(&ListReportsQuery::default().status(ReportStatus::Submitted))
		.await?;

	println!(
		"Listed {} report(s) after {} refresh call(s); state is {}.",
		page.data.len(),
		client.refresh_metrics.attempts(),
		client.session_state().await?,
	);

	login_mock.assert_async().await;
	stale_mock.assert_async().await;
	refresh_mock.assert_async().await;
	list_mock.assert_async().await;

	Ok(())
}
