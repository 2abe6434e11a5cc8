//! Damaged-road report endpoints.

// self
use crate::{
	_prelude::*,
	api::{
		CreateDamagedRoadRequest, DamagedRoad, DamagedRoadList, ListReportsQuery, REPORTS_PATH,
		ReportStatus, UpdateStatusRequest,
	},
	error::ConfigError,
	http::ApiHttpClient,
	obs::{self, OpKind},
	pipeline::{ApiClient, ApiRequest},
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Submits a new report.
	pub async fn create_report(&self, body: &CreateDamagedRoadRequest) -> Result<DamagedRoad> {
		obs::observe(OpKind::Reports, "create_report", async move {
			self.dispatch_json(ApiRequest::post(REPORTS_PATH).json(body)?).await
		})
		.await
	}

	/// Fetches one report.
	pub async fn report(&self, id: &str) -> Result<DamagedRoad> {
		obs::observe(OpKind::Reports, "report", async move {
			self.dispatch_json(ApiRequest::get(report_path(id)?)).await
		})
		.await
	}

	/// Lists reports matching `query`.
	pub async fn list_reports(&self, query: &ListReportsQuery) -> Result<DamagedRoadList> {
		obs::observe(OpKind::Reports, "list_reports", async move {
			let request = query
				.pairs()
				.into_iter()
				.fold(ApiRequest::get(REPORTS_PATH), |request, (key, value)| {
					request.query(key, value)
				});

			self.dispatch_json(request).await
		})
		.await
	}

	/// Moves a report to `status`. Only verifiers are accepted by the backend.
	pub async fn update_report_status(&self, id: &str, status: ReportStatus) -> Result<DamagedRoad> {
		obs::observe(OpKind::Reports, "update_report_status", async move {
			let request = ApiRequest::put(format!("{}/status", report_path(id)?))
				.json(&UpdateStatusRequest { status })?;

			self.dispatch_json(request).await
		})
		.await
	}
}

// Dot segments would be resolved away by `Url::join` and escape the collection.
fn report_path(id: &str) -> Result<String, ConfigError> {
	let invalid = |source| ConfigError::InvalidPath { path: id.to_owned(), source };

	if matches!(id, "" | "." | "..") {
		return Err(invalid(None));
	}

	let mut url = Url::parse("http://localhost/").map_err(|e| invalid(Some(e)))?;

	url.path_segments_mut()
		.map_err(|_| invalid(None))?
		.pop_if_empty()
		.push(REPORTS_PATH.trim_start_matches('/'))
		.push(id);

	Ok(url.path().to_owned())
}
