//! Wire payloads exchanged with the reporting API.

// self
use crate::{_prelude::*, auth::UserProfile};

/// Error payload returned with non-2xx responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable explanation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Free-form details, typically per-field validation messages.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
	/// Display name.
	pub name: String,
	/// Login email.
	pub email: String,
	/// Plain-text password, sent over TLS only.
	pub password: String,
}

/// Account created by `POST /auth/register`. Registration issues no tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
	/// Account identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Login email.
	pub email: String,
	/// Assigned role label.
	pub role: String,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Login email.
	pub email: String,
	/// Plain-text password.
	pub password: String,
}

/// Token pair and profile returned by `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
	/// Access token.
	pub access_token: String,
	/// Refresh token.
	pub refresh_token: String,
	/// Token type, normally `Bearer`.
	pub token_type: String,
	/// Access token lifetime in seconds.
	pub expires_in: i64,
	/// Signed-in profile.
	pub user: UserProfile,
}

/// Body of `POST /auth/refresh`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
	/// Stored refresh token.
	pub refresh_token: String,
}

/// New access token returned by `POST /auth/refresh`; the refresh token is not rotated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenResponse {
	/// Fresh access token.
	pub access_token: String,
	/// Token type, normally `Bearer`.
	pub token_type: String,
	/// Access token lifetime in seconds.
	pub expires_in: i64,
}

/// Body of `POST /auth/password/reset-request`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
	/// Account email that receives the reset link.
	pub email: String,
}

/// Body of `POST /auth/password/reset-confirm`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
	/// Token from the reset link.
	pub token: String,
	/// Replacement password.
	pub new_password: String,
}

/// Review workflow status of a damage report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
	/// Freshly submitted by a citizen.
	Submitted,
	/// Picked up by a verifier.
	UnderVerification,
	/// Confirmed as real damage.
	Verified,
	/// Repair reported, awaiting confirmation.
	PendingResolved,
	/// Repair confirmed.
	Resolved,
	/// Closed without further action.
	Archived,
}
impl ReportStatus {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Submitted => "submitted",
			Self::UnderVerification => "under_verification",
			Self::Verified => "verified",
			Self::PendingResolved => "pending_resolved",
			Self::Resolved => "resolved",
			Self::Archived => "archived",
		}
	}
}
impl Display for ReportStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// WGS84 coordinate picked on the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Latitude in degrees.
	pub latitude: f64,
	/// Longitude in degrees.
	pub longitude: f64,
}

/// GeoJSON-style geometry; coordinates are `[longitude, latitude]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
	/// Geometry kind, e.g. `LineString`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Coordinate pairs.
	pub coordinates: Vec<Vec<f64>>,
}
impl Geometry {
	/// Returns the coordinates as [`Point`]s, skipping malformed pairs.
	pub fn points(&self) -> Vec<Point> {
		self.coordinates
			.iter()
			.filter_map(|pair| match pair.as_slice() {
				[longitude, latitude, ..] =>
					Some(Point { latitude: *latitude, longitude: *longitude }),
				_ => None,
			})
			.collect()
	}
}

/// A stored damage report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamagedRoad {
	/// Report identifier.
	pub id: String,
	/// Reporter account identifier.
	pub author_id: String,
	/// Short title.
	pub title: String,
	/// Administrative subdistrict code.
	pub subdistrict_code: String,
	/// Damaged stretch of road.
	pub path: Geometry,
	/// Uploaded photo URLs.
	pub photo_urls: Vec<String>,
	/// Optional free-text description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Workflow status.
	pub status: ReportStatus,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// Body of `POST /damaged-roads`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateDamagedRoadRequest {
	/// Short title.
	pub title: String,
	/// Administrative subdistrict code.
	pub subdistrict_code: String,
	/// Points along the damaged stretch.
	pub path_points: Vec<Point>,
	/// Uploaded photo URLs.
	pub photo_urls: Vec<String>,
	/// Optional free-text description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Body of `PUT /damaged-roads/{id}/status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	/// Target status.
	pub status: ReportStatus,
}

/// Pagination block of list responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
	/// 1-based page number.
	pub page: u32,
	/// Page size.
	pub limit: u32,
	/// Offset of the first item.
	pub offset: u64,
	/// Total matching items.
	pub total: u64,
}
impl PaginationMeta {
	/// Returns `true` when items remain past this page.
	pub fn has_next(&self) -> bool {
		self.offset + u64::from(self.limit) < self.total
	}
}

/// Page of reports returned by `GET /damaged-roads`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamagedRoadList {
	/// Reports on this page.
	pub data: Vec<DamagedRoad>,
	/// Pagination metadata.
	pub pagination: PaginationMeta,
}

/// Filters and paging for `GET /damaged-roads`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListReportsQuery {
	/// 1-based page number.
	pub page: Option<u32>,
	/// Page size.
	pub per_page: Option<u32>,
	/// Status filter.
	pub status: Option<ReportStatus>,
	/// Subdistrict filter.
	pub subdistrict_code: Option<String>,
}
impl ListReportsQuery {
	/// Selects a page.
	pub fn page(mut self, page: u32) -> Self {
		self.page = Some(page);

		self
	}

	/// Sets the page size.
	pub fn per_page(mut self, per_page: u32) -> Self {
		self.per_page = Some(per_page);

		self
	}

	/// Filters by status.
	pub fn status(mut self, status: ReportStatus) -> Self {
		self.status = Some(status);

		self
	}

	/// Filters by subdistrict.
	pub fn subdistrict_code(mut self, code: impl Into<String>) -> Self {
		self.subdistrict_code = Some(code.into());

		self
	}

	/// Returns the populated parameters in a stable order.
	pub fn pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(page) = self.page {
			pairs.push(("page", page.to_string()));
		}
		if let Some(per_page) = self.per_page {
			pairs.push(("per_page", per_page.to_string()));
		}
		if let Some(status) = self.status {
			pairs.push(("status", status.as_str().to_owned()));
		}
		if let Some(code) = &self.subdistrict_code {
			pairs.push(("subdistrict_code", code.clone()));
		}

		pairs
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn report_parses_backend_shape() {
		let payload = r#"{
			"id": "r-1",
			"author_id": "u-1",
			"title": "Pothole near market",
			"subdistrict_code": "3171010",
			"path": {"type": "LineString", "coordinates": [[106.8, -6.2], [106.81, -6.21]]},
			"photo_urls": ["https://cdn.example.com/p1.jpg"],
			"status": "under_verification",
			"created_at": "2025-04-01T07:00:00Z",
			"updated_at": "2025-04-02T07:00:00+07:00"
		}"#;
		let report: DamagedRoad =
			serde_json::from_str(payload).expect("Report payload should deserialize.");

		assert_eq!(report.status, ReportStatus::UnderVerification);
		assert_eq!(report.path.kind, "LineString");
		assert_eq!(report.path.points()[0], Point { latitude: -6.2, longitude: 106.8 });
		assert!(report.description.is_none());
	}

	#[test]
	fn list_query_emits_only_populated_pairs() {
		let query =
			ListReportsQuery::default().page(2).status(ReportStatus::PendingResolved);

		assert_eq!(
			query.pairs(),
			vec![("page", "2".to_owned()), ("status", "pending_resolved".to_owned())]
		);
		assert!(ListReportsQuery::default().pairs().is_empty());
	}

	#[test]
	fn pagination_reports_remaining_pages() {
		let meta = PaginationMeta { page: 1, limit: 10, offset: 0, total: 25 };

		assert!(meta.has_next());
		assert!(!PaginationMeta { page: 3, limit: 10, offset: 20, total: 25 }.has_next());
	}
}
