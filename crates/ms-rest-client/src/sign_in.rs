//! Password and one-time code sign-in

use std::sync::Arc;

use ms_client_api::{ConfirmationProvider, PasswordProvider};
use ms_rest_api_contract::validation::{validate_code_auth_request, validate_sign_in_request};
use ms_rest_api_contract::{CodeAuthRequest, SignInRequest, SignInResponse};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use tracing::{debug, warn};

use crate::auth::{cookies_from_headers, AuthConfig, AuthMethod};
use crate::client::{decode_json, RestClient};
use crate::config::{BackendEnvironment, ClientConfig};
use crate::error::{RestClientError, RestClientResult};

const SIGN_IN_PATH: &str = "users/sign_in";
const CODE_AUTH_PATH: &str = "users/code_auth";

impl RestClient {
    /// Sign in as `email` and return a client bound to that session.
    ///
    /// The password, and the emailed code when the account requires one,
    /// come from `passwords`. `confirmations` is kept for the guarded
    /// production instance switch.
    pub async fn connect(
        config: ClientConfig,
        email: &str,
        passwords: &dyn PasswordProvider,
        confirmations: Arc<dyn ConfirmationProvider>,
    ) -> RestClientResult<Self> {
        let environment = config.environment;
        match environment {
            BackendEnvironment::Production => {
                warn!("Connecting to Mindsay on {}...", environment)
            }
            BackendEnvironment::Staging => warn!(
                "Connecting to Mindsay on {}... \
                 Remember to connect to the Mindsay WiFi or set up a SSH tunnel!",
                environment
            ),
        }

        let mut client = Self::new(config, AuthConfig::default(), confirmations)?;
        client.user_sign_in(email, passwords).await?;

        warn!("Connected to Mindsay on {}", environment);
        Ok(client)
    }

    /// Submit the password and keep the `Authorization` value handed back
    async fn user_sign_in(
        &mut self,
        email: &str,
        passwords: &dyn PasswordProvider,
    ) -> RestClientResult<()> {
        let request = SignInRequest::new(email, passwords.password(email)?);
        validate_sign_in_request(&request)?;

        let response = self
            .send(Method::POST, SIGN_IN_PATH, Some(&request))
            .await
            .map_err(auth_failure("sign-in"))?;

        let token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                RestClientError::Auth("sign-in response carried no Authorization header".to_string())
            })?
            .to_string();
        self.auth.method = AuthMethod::session_token(token);

        let body: SignInResponse = decode_json(SIGN_IN_PATH, response).await?;
        if body.otp_required_for_login {
            debug!("one-time code required for {}", email);
            self.user_code_auth(email, passwords).await?;
        }
        Ok(())
    }

    /// Submit the emailed code; the response cookies replace the whole jar
    async fn user_code_auth(
        &mut self,
        email: &str,
        passwords: &dyn PasswordProvider,
    ) -> RestClientResult<()> {
        let request = CodeAuthRequest::new(email, passwords.one_time_code(email)?);
        validate_code_auth_request(&request)?;

        let response = self
            .send(Method::POST, CODE_AUTH_PATH, Some(&request))
            .await
            .map_err(auth_failure("one-time code check"))?;

        self.auth.replace_cookies(cookies_from_headers(response.headers()));
        Ok(())
    }
}

/// Rejections during sign-in are authentication failures, not resource errors
fn auth_failure(step: &'static str) -> impl Fn(RestClientError) -> RestClientError {
    move |err| match err {
        RestClientError::ServerError { status, body, .. } => {
            RestClientError::Auth(format!("{step} rejected with status {status}: {body}"))
        }
        other => other,
    }
}
