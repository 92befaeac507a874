//! Authenticated sessions against wywrota.pl.
//!
//! Login is a three-step handshake: fetch the login page and pull the CSRF
//! token out of its hidden `_token` input, POST the credentials as JSON
//! together with that token, then confirm the `user_logged_in` marker in the
//! response body. The marker check is a hard gate: every later fetch relies
//! on the session cookies this handshake established.

use std::time::Duration;

use scraper::{Html, Selector};
use serde::Serialize;
use wywrota_model::Song;

use crate::error::{Result, SessionError};
use crate::extract;

/// Login page that carries the hidden `_token` input.
const TOKEN_URL: &str = "https://www.wywrota.pl/login";

/// Endpoint the credential POST goes to.
const LOGIN_URL: &str = "https://moja.wywrota.pl/login";

/// Deadline for the login POST. The site can hang on bad credentials
/// instead of answering, so the request is cancelled rather than awaited
/// indefinitely.
const LOGIN_TIMEOUT_MS: u64 = 3000;

const USER_AGENT: &str = "wywrota/0.1 (songbook fetch tool)";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "_token")]
    token: &'a str,
    remember: &'a str,
}

/// An authenticated session against wywrota.pl.
///
/// The session exclusively owns its connection pool and cookie store.
/// Dropping it (or calling [`Session::close`]) shuts the pool down; this
/// holds on every exit path, including a login that fails partway through.
pub struct Session {
    client: reqwest::Client,
    token: Option<String>,
    logged_in: bool,
}

impl Session {
    /// Create a session and log in with the given credentials.
    ///
    /// The credentials are used for the single login request and not
    /// retained.
    pub async fn log_in(username: &str, password: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        let mut session = Self {
            client,
            token: None,
            logged_in: false,
        };
        session.authenticate(username, password).await?;
        Ok(session)
    }

    async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let token = self.retrieve_token().await?;
        tracing::debug!(token_len = token.len(), "Retrieved CSRF token");

        let body = LoginRequest {
            username,
            password,
            token: &token,
            remember: "0",
        };
        let request = self.client.post(LOGIN_URL).json(&body).send();
        let response = tokio::time::timeout(Duration::from_millis(LOGIN_TIMEOUT_MS), request)
            .await
            .map_err(|_| SessionError::LoginTimeout(LOGIN_TIMEOUT_MS))??;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::LoginRejected(format!("HTTP {status}")));
        }

        let content = response.text().await?;
        if !scan_login_marker(&content) {
            return Err(SessionError::LoginRejected(
                "logged-in marker missing from response".into(),
            ));
        }

        self.token = Some(token);
        self.logged_in = true;
        tracing::info!("Logged in to wywrota.pl");
        Ok(())
    }

    /// Fetch the login page and extract the CSRF token from it.
    async fn retrieve_token(&self) -> Result<String> {
        tracing::debug!(url = %TOKEN_URL, "Fetching login page");
        let page = self.client.get(TOKEN_URL).send().await?.text().await?;
        extract_token(&page).ok_or(SessionError::TokenNotFound)
    }

    /// Whether the login handshake completed successfully.
    pub fn is_authenticated(&self) -> bool {
        self.logged_in
    }

    /// The CSRF token retrieved during login, once authenticated.
    pub fn csrf_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Fetch a song page and split it into lyrics and chords.
    ///
    /// Returns `Ok(None)` when the page answers with a non-success status
    /// or carries no usable content block — "song absent", not an error.
    /// Unlike login, this request has no explicit deadline and relies on
    /// the transport's defaults.
    pub async fn fetch_song(&self, url: &str) -> Result<Option<Song>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, url, "Song page returned non-success status");
            return Ok(None);
        }

        let html = response.text().await?;
        tracing::debug!(bytes = html.len(), url, "Received song page");
        Ok(extract::split_content(&html))
    }

    /// Close the session, releasing the connection pool and cookie store.
    ///
    /// Equivalent to dropping the session; provided so the hand-back of the
    /// connection resources can be spelled out at the call site.
    pub fn close(self) {}
}

/// Extract the `value` of the first input named `_token`, if any.
fn extract_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"input[name="_token"]"#).expect("valid selector");

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Scan a login response body for the `user_logged_in` marker.
///
/// Looks for the first ASCII digit between the `:` after the marker and the
/// `,` after that; `'1'` means logged in. The body is JSON-ish text inside
/// an inline script and not guaranteed well-formed, so this is a deliberate
/// substring scan, not a JSON parse. If the site ever changes the text
/// around the marker this returns `false` instead of erroring.
fn scan_login_marker(content: &str) -> bool {
    let Some(start) = content.find("user_logged_in") else {
        return false;
    };
    let section = &content[start..];
    let Some(colon) = section.find(':') else {
        return false;
    };
    let section = &section[colon..];
    let Some(comma) = section.find(',') else {
        return false;
    };

    section[..comma]
        .chars()
        .find(char::is_ascii_digit)
        .is_some_and(|digit| digit == '1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        let html = r#"
        <html><body>
        <form method="POST" action="/login">
          <input type="hidden" name="_token" value="abc123xyz">
          <input type="text" name="username">
        </form>
        </body></html>
        "#;
        assert_eq!(extract_token(html), Some("abc123xyz".to_string()));
    }

    #[test]
    fn test_extract_token_takes_first_match() {
        let html = r#"
        <form><input name="_token" value="first"></form>
        <form><input name="_token" value="second"></form>
        "#;
        assert_eq!(extract_token(html), Some("first".to_string()));
    }

    #[test]
    fn test_extract_token_missing() {
        let html = r#"<html><body><input name="username"></body></html>"#;
        assert_eq!(extract_token(html), None);
    }

    #[test]
    fn test_marker_logged_in() {
        let content = r#"<script>var app = {"user_logged_in":1,"user_id":552};</script>"#;
        assert!(scan_login_marker(content));
    }

    #[test]
    fn test_marker_logged_out() {
        let content = r#"<script>var app = {"user_logged_in":0,"user_id":0};</script>"#;
        assert!(!scan_login_marker(content));
    }

    #[test]
    fn test_marker_with_spacing() {
        let content = r#"user_logged_in" : 1 , "next""#;
        assert!(scan_login_marker(content));
    }

    #[test]
    fn test_marker_absent() {
        assert!(!scan_login_marker("<html><body>welcome</body></html>"));
        assert!(!scan_login_marker(""));
    }

    #[test]
    fn test_marker_never_panics_on_truncated_body() {
        // Marker present but the surrounding punctuation is cut off.
        assert!(!scan_login_marker("user_logged_in"));
        assert!(!scan_login_marker("user_logged_in:"));
        assert!(!scan_login_marker("user_logged_in:1"));
        assert!(!scan_login_marker("user_logged_in:,"));
    }
}
