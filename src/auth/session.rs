//! Token pair and session lifecycle states.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access and refresh credentials that are always stored together.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
	/// Short-lived credential attached to protected requests.
	pub access_token: TokenSecret,
	/// Longer-lived credential used only to mint new access tokens.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}

/// Session lifecycle as observed by a single caller.
///
/// `Anonymous` moves to `Authenticated` on login. Any 401 moves an authenticated session to
/// `RefreshPending`, which settles back to `Authenticated` when the refresh succeeds or to
/// `Anonymous` (forced logout) when it fails. Explicit logout returns to `Anonymous`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
	/// No token pair is stored.
	Anonymous,
	/// A token pair is stored and no refresh is running.
	Authenticated,
	/// A refresh call is in flight.
	RefreshPending,
}
impl SessionState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Anonymous => "anonymous",
			Self::Authenticated => "authenticated",
			Self::RefreshPending => "refresh_pending",
		}
	}
}
impl Display for SessionState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
