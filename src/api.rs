//! Typed wrappers for the reporting API, all routed through [`ApiClient::dispatch`].
//!
//! [`ApiClient::dispatch`]: crate::pipeline::ApiClient::dispatch

pub mod auth;
pub mod model;
pub mod reports;

pub use model::*;

/// `POST` target for registration.
pub const REGISTER_PATH: &str = "/auth/register";
/// `POST` target for login.
pub const LOGIN_PATH: &str = "/auth/login";
/// `POST` target for logout.
pub const LOGOUT_PATH: &str = "/auth/logout";
/// `POST` target for access-token refresh.
pub const REFRESH_PATH: &str = "/auth/refresh";
/// `POST` target for password-reset emails.
pub const PASSWORD_RESET_REQUEST_PATH: &str = "/auth/password/reset-request";
/// `POST` target for completing a password reset.
pub const PASSWORD_RESET_CONFIRM_PATH: &str = "/auth/password/reset-confirm";
/// Collection root for damage reports.
pub const REPORTS_PATH: &str = "/damaged-roads";
