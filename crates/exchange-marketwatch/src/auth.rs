//! Sign-in flow against the Dow Jones single-sign-on provider.
//!
//! The flow is three requests:
//!
//! 1. `GET {accounts}/login`, which redirects to the SSO authorize page. The
//!    final URL carries `client`, `nonce` and `state`, and the jar picks up a
//!    `_csrf` cookie.
//! 2. `POST {sso}/usernamepassword/login` with the credentials. On success the
//!    response is an auto-submitting form with hidden `wa`, `wresult` and
//!    `wctx` inputs.
//! 3. `POST {sso}/login/callback` with those inputs, which sets the session
//!    cookies used by the game pages.
//!
//! # Security
//!
//! The password is held as a `SecretString` and is only exposed while the
//! login form is serialized. It is never logged.

use crate::error::{MarketWatchError, Result};
use crate::scrape;
use crate::session::Session;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

// =============================================================================
// Constants
// =============================================================================

const CONNECTION: &str = "DJldap";
const NAMESPACE: &str = "prod/accounts-mw";
const PROTOCOL: &str = "oauth2";
const RESPONSE_TYPE: &str = "code";
const TENANT: &str = "sso";
const UI_LOCALES: &str = ",en-us-x-mw-3-8";
const INTSTATE: &str = "deprecated";
const REMOTE_USER_HEADER: &str = "X-REMOTE-USER";

/// OAuth scopes requested for the game session.
pub const SCOPE: &str = "openid idp_id roles email given_name family_name djid djUsername \
                         djStatus trackid tags prts suuid createTimestamp";

/// Name of the anti-forgery cookie set by the login page.
pub const CSRF_COOKIE: &str = "_csrf";

// =============================================================================
// Authorize Parameters
// =============================================================================

/// Parameters the login redirect hands to the SSO provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeParams {
    /// OAuth client id (`client` query parameter).
    pub client_id: String,

    /// One-time nonce.
    pub nonce: String,

    /// Opaque state echoed back by the provider.
    pub state: String,
}

impl AuthorizeParams {
    /// Reads the parameters from the URL the login page redirected to.
    ///
    /// # Errors
    /// Returns `Authentication` if any parameter is missing.
    pub fn from_url(url: &Url) -> Result<Self> {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .ok_or_else(|| {
                    MarketWatchError::Authentication(format!(
                        "login redirect is missing `{name}` (landed on {})",
                        url.path()
                    ))
                })
        };

        Ok(Self {
            client_id: param("client")?,
            nonce: param("nonce")?,
            state: param("state")?,
        })
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Credentials form posted to the SSO provider.
#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    client_id: &'a str,
    connection: &'static str,
    headers: &'static str,
    nonce: &'a str,
    ns: &'static str,
    password: &'a str,
    protocol: &'static str,
    redirect_uri: String,
    response_type: &'static str,
    scope: &'static str,
    state: &'a str,
    tenant: &'static str,
    ui_locales: &'static str,
    username: &'a str,
    #[serde(rename = "_csrf")]
    csrf: &'a str,
    #[serde(rename = "_intstate")]
    intstate: &'static str,
}

/// Hidden fields relayed from the SSO response to the callback endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackForm {
    /// Sign-in action (`wa`).
    pub wa: String,

    /// Signed token (`wresult`).
    pub wresult: String,

    /// Context blob (`wctx`).
    pub wctx: String,
}

// =============================================================================
// Flow
// =============================================================================

/// Runs the three-step sign-in on `session`.
///
/// # Errors
/// Returns `Authentication` when the provider rejects the credentials or a
/// step does not produce what the next one needs.
pub async fn sign_in(session: &Session, email: &str, password: &SecretString) -> Result<()> {
    let config = session.config();

    let login_page = session.get(&config.accounts_endpoint("/login")).await?;
    let landed_on = login_page.url().clone();
    let params = AuthorizeParams::from_url(&landed_on)?;

    let sso_login_url = config.sso_endpoint("/usernamepassword/login");
    let csrf = session
        .cookie(&landed_on, CSRF_COOKIE)
        .or_else(|| {
            Url::parse(&sso_login_url)
                .ok()
                .and_then(|url| session.cookie(&url, CSRF_COOKIE))
        })
        .ok_or_else(|| {
            MarketWatchError::Authentication("login page did not set a _csrf cookie".to_string())
        })?;

    tracing::debug!(client_id = %params.client_id, "Submitting credentials to SSO");

    let redirect_uri = config.accounts_endpoint("/auth/sso/login");
    let form = LoginForm {
        client_id: &params.client_id,
        connection: CONNECTION,
        headers: REMOTE_USER_HEADER,
        nonce: &params.nonce,
        ns: NAMESPACE,
        password: password.expose_secret(),
        protocol: PROTOCOL,
        redirect_uri,
        response_type: RESPONSE_TYPE,
        scope: SCOPE,
        state: &params.state,
        tenant: TENANT,
        ui_locales: UI_LOCALES,
        username: email,
        csrf: &csrf,
        intstate: INTSTATE,
    };

    let response = session
        .post_form(&sso_login_url, &form)
        .await
        .map_err(|e| match e {
            MarketWatchError::Api {
                status_code,
                message,
            } if (400..500).contains(&status_code) => MarketWatchError::Authentication(format!(
                "credentials rejected ({status_code}): {message}"
            )),
            other => other,
        })?;
    let body = response.text().await?;

    let callback = scrape::callback_form(&body).ok_or_else(|| {
        MarketWatchError::Authentication(
            "no sign-in callback form in SSO response (check email and password)".to_string(),
        )
    })?;

    session
        .post_form(&config.sso_endpoint("/login/callback"), &callback)
        .await?;

    Ok(())
}

/// Fails unless the game page answers with 200.
///
/// # Errors
/// Returns `GameUnavailable` carrying the status otherwise.
pub async fn ensure_game_available(session: &Session, game: &str) -> Result<()> {
    let url = session.config().game_endpoint(game, "");
    let status = session.get(&url).await?.status();

    if status != reqwest::StatusCode::OK {
        return Err(MarketWatchError::game_unavailable(game, status.as_u16()));
    }
    Ok(())
}

/// Reads the player id embedded in the game portfolio page.
///
/// # Errors
/// Returns `Authentication` if the page has no player id, which happens when
/// the session is not signed in to the game.
pub async fn resolve_player_id(session: &Session, game: &str) -> Result<String> {
    let page = session
        .get_text(&session.config().game_endpoint(game, "/portfolio"))
        .await?;

    scrape::player_id(&page).ok_or_else(|| {
        MarketWatchError::Authentication(format!("no player id on portfolio page of {game}"))
    })
}
