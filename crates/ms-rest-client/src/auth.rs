//! Session credentials attached to every request

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, COOKIE, SET_COOKIE};

/// Authorization state of a session
#[derive(Debug, Clone, Default)]
pub enum AuthMethod {
    /// `Authorization` value handed out by `users/sign_in`, replayed verbatim
    SessionToken(String),
    /// Not signed in yet
    #[default]
    None,
}

impl AuthMethod {
    /// Apply authentication headers to a request
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        match self {
            AuthMethod::SessionToken(token) => {
                let mut value = HeaderValue::from_str(token)?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            AuthMethod::None => {}
        }
        Ok(())
    }

    pub fn session_token(token: impl Into<String>) -> Self {
        Self::SessionToken(token.into())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthMethod::SessionToken(_))
    }
}

/// A cookie granted by the back-office after a one-time code check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the `name=value` part of a `Set-Cookie` header, ignoring attributes
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }
}

/// Extract every cookie set by a response
pub fn cookies_from_headers(headers: &HeaderMap) -> Vec<SessionCookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(SessionCookie::parse_set_cookie)
        .collect()
}

/// Cookies of a session, kept up to date from every response.
///
/// Clones share the same cookies.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<RwLock<Vec<SessionCookie>>>,
}

impl CookieJar {
    pub fn new(cookies: Vec<SessionCookie>) -> Self {
        Self {
            cookies: Arc::new(RwLock::new(cookies)),
        }
    }

    /// Current cookies in the order they were first set
    pub fn cookies(&self) -> Vec<SessionCookie> {
        self.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Store cookies set by a response: a known name is overwritten in
    /// place, an empty value removes the cookie
    pub fn merge(&self, cookies: Vec<SessionCookie>) {
        if cookies.is_empty() {
            return;
        }
        let mut jar = self.write();
        for cookie in cookies {
            let existing = jar.iter().position(|c| c.name == cookie.name);
            match (existing, cookie.value.is_empty()) {
                (Some(index), true) => {
                    jar.remove(index);
                }
                (Some(index), false) => jar[index] = cookie,
                (None, true) => {}
                (None, false) => jar.push(cookie),
            }
        }
    }

    /// Drop every cookie and keep only `cookies`
    pub fn replace(&self, cookies: Vec<SessionCookie>) {
        let mut jar = self.write();
        jar.clear();
        jar.extend(cookies.into_iter().filter(|c| !c.value.is_empty()));
    }

    /// `Cookie` header value, `None` when the jar is empty
    pub fn header_value(&self) -> Option<String> {
        let jar = self.read();
        if jar.is_empty() {
            return None;
        }
        Some(
            jar.iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SessionCookie>> {
        self.cookies.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SessionCookie>> {
        self.cookies.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Authentication configuration for the client
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub cookies: CookieJar,
}

impl AuthConfig {
    /// Create an auth config from an already issued session token
    pub fn with_session_token(token: impl Into<String>) -> Self {
        Self {
            method: AuthMethod::session_token(token),
            cookies: CookieJar::default(),
        }
    }

    /// Swap the cookie set for the one granted by the latest response
    pub fn replace_cookies(&self, cookies: Vec<SessionCookie>) {
        self.cookies.replace(cookies);
    }

    /// Get headers for this authentication configuration
    pub fn headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        self.method.apply_to_headers(&mut headers)?;

        if let Some(cookie) = self.cookies.header_value() {
            let mut value = HeaderValue::from_str(&cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        Ok(headers)
    }
}
