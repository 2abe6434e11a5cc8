//! Signed-in user profile persisted alongside the token pair.

// self
use crate::_prelude::*;

/// Role assigned to an account by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
	/// Citizen reporter.
	User,
	/// Verifier allowed to progress report status.
	Verificator,
}
impl UserRole {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Verificator => "verificator",
		}
	}

	/// Returns `true` when the role may change report status.
	pub const fn can_verify(self) -> bool {
		matches!(self, Self::Verificator)
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Profile returned by login and stored under the `user_profile` session key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Account identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Login email.
	pub email: String,
	/// Account role.
	pub role: UserRole,
	/// Account creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Previous login instant, when the backend reports one.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub last_login: Option<OffsetDateTime>,
}
