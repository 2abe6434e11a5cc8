//! Account endpoints: registration, login/logout, explicit refresh, and password reset.
//!
//! Credential endpoints opt out of session recovery, so a 401 from `/auth/login` reads as
//! "wrong credentials" instead of triggering a refresh and a forced logout.

// self
use crate::{
	_prelude::*,
	api::{
		AuthResponse, ForgotPasswordRequest, LOGIN_PATH, LOGOUT_PATH, LoginRequest,
		PASSWORD_RESET_CONFIRM_PATH, PASSWORD_RESET_REQUEST_PATH, REFRESH_PATH, REGISTER_PATH,
		RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, RegisterResponse,
		ResetPasswordRequest,
	},
	auth::{TokenPair, UserProfile},
	http::ApiHttpClient,
	obs::{self, OpKind},
	pipeline::{ApiClient, ApiRequest},
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates an account. No session is stored; call [`login`](Self::login) afterwards.
	pub async fn register(&self, body: &RegisterRequest) -> Result<RegisterResponse> {
		obs::observe(OpKind::Auth, "register", async move {
			let request = ApiRequest::post(REGISTER_PATH).json(body)?.without_session_recovery();

			self.dispatch_json(request).await
		})
		.await
	}

	/// Signs in and persists the token pair plus profile.
	pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse> {
		obs::observe(OpKind::Auth, "login", async move {
			let request = ApiRequest::post(LOGIN_PATH).json(body)?.without_session_recovery();
			let response: AuthResponse = self.dispatch_json(request).await?;
			let tokens = TokenPair::new(&response.access_token, &response.refresh_token);

			self.session.save_login(&tokens, &response.user).await?;

			Ok(response)
		})
		.await
	}

	/// Signs out. The local session is cleared even when the server call fails.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(OpKind::Auth, "logout", async move {
			let result =
				self.dispatch(ApiRequest::post(LOGOUT_PATH).without_session_recovery()).await;

			self.session.clear().await?;
			result.map(|_| ())
		})
		.await
	}

	/// Exchanges a caller-supplied refresh token for a new access token and stores the pair.
	///
	/// Unlike [`refresh_session`](Self::refresh_session) this bypasses single-flight
	/// coordination and never tears the session down.
	pub async fn refresh_token(&self, body: &RefreshTokenRequest) -> Result<RefreshTokenResponse> {
		obs::observe(OpKind::Auth, "refresh_token", async move {
			let request = ApiRequest::post(REFRESH_PATH).json(body)?.without_session_recovery();
			let response: RefreshTokenResponse = self.dispatch_json(request).await?;

			self.session
				.save_tokens(&TokenPair::new(&response.access_token, &body.refresh_token))
				.await?;

			Ok(response)
		})
		.await
	}

	/// Requests a password-reset email.
	pub async fn forgot_password(&self, body: &ForgotPasswordRequest) -> Result<()> {
		obs::observe(OpKind::Auth, "forgot_password", async move {
			let request =
				ApiRequest::post(PASSWORD_RESET_REQUEST_PATH).json(body)?.without_session_recovery();

			self.dispatch(request).await.map(|_| ())
		})
		.await
	}

	/// Completes a password reset with the emailed token.
	pub async fn reset_password(&self, body: &ResetPasswordRequest) -> Result<()> {
		obs::observe(OpKind::Auth, "reset_password", async move {
			let request =
				ApiRequest::post(PASSWORD_RESET_CONFIRM_PATH).json(body)?.without_session_recovery();

			self.dispatch(request).await.map(|_| ())
		})
		.await
	}

	/// Returns the profile stored at login.
	pub async fn profile(&self) -> Result<UserProfile> {
		self.session.profile().await?.ok_or(Error::NoSession)
	}
}
