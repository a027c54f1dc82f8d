use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{OAuthError, Result};
use crate::models::{AccessToken, ClientConfig, TokenRequest, TokenResponse, AUTHORIZATION_CODE_GRANT};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Join scopes into the single space-separated value OAuth expects
pub fn join_scopes<S: AsRef<str>>(scopes: &[S]) -> String {
    scopes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// OAuth 2.0 authorization code client.
///
/// Holds the immutable client registration and the transport used to reach
/// the token endpoint. Share it behind an `Arc` for concurrent use.
pub struct OAuthClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl OAuthClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T> OAuthClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the URI the resource owner is redirected to.
    ///
    /// The path of `base_url` is replaced by the configured authorization path
    /// and its query by `client_id`, `redirect_uri`, `response_type=code` and
    /// `scope`, in that order. No I/O happens here.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if `base_url` does not parse, `MissingHost` if it has no host.
    pub fn authorization_uri<S: AsRef<str>>(&self, base_url: &str, scopes: &[S]) -> Result<Url> {
        let mut uri = endpoint_url(base_url, self.config.authorization_path())?;

        uri.query_pairs_mut()
            .clear()
            .append_pair("client_id", self.config.client_id())
            .append_pair("redirect_uri", self.config.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &join_scopes(scopes));

        Ok(uri)
    }
}

impl<T: HttpTransport> OAuthClient<T> {
    /// Exchange an authorization code for an access/refresh token pair.
    ///
    /// Sends a single JSON POST to the token endpoint. Only status 200 yields a
    /// token; any other status is reported as `OAuthError::Protocol` carrying
    /// the server's `error` and `error_description`. There are no retries.
    ///
    /// # Errors
    ///
    /// `InvalidUrl`/`MissingHost` for a bad `token_url`, `EmptyCode` for an
    /// empty `code` (checked before any network activity), `Transport` when the
    /// endpoint cannot be reached and `Protocol` for a non-200 answer.
    #[instrument(
        name = "oauth.exchange_code",
        skip(self, token_url, code, scopes),
        fields(client_id = %self.config.client_id())
    )]
    pub async fn exchange_code<S: AsRef<str> + Sync>(
        &self,
        token_url: &str,
        code: &str,
        scopes: &[S],
    ) -> Result<AccessToken> {
        let token_uri = endpoint_url(token_url, self.config.token_path())?;

        if code.is_empty() {
            return Err(OAuthError::EmptyCode);
        }

        let scope = join_scopes(scopes);
        let payload = TokenRequest {
            grant_type: AUTHORIZATION_CODE_GRANT,
            client_id: self.config.client_id(),
            client_secret: self.config.client_secret(),
            code,
            scope: &scope,
            redirect_uri: self.config.redirect_uri(),
        };
        let body = serde_json::to_vec(&payload)?;

        let request = http::Request::builder()
            .method(Method::POST)
            .uri(token_uri.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| OAuthError::Transport(Box::new(e)))?;

        let log_uri = without_credentials(&token_uri);
        debug!(token_uri = %log_uri, scope = %scope, "Sending authorization code exchange");

        let response = self.transport.execute(request).await.map_err(|err| {
            warn!(
                token_uri = %log_uri,
                error = %logger_redacted::redact(&err.to_string()),
                "Token endpoint unreachable"
            );
            OAuthError::Transport(err)
        })?;

        let status = response.status();
        let token_response = TokenResponse::from_body(response.body());
        drop(response);

        if status == StatusCode::OK {
            let token = token_response.into_access_token();
            info!(
                token_type = %token.token_type,
                expires_in = token.expires_in,
                "Authorization code exchanged"
            );
            return Ok(token);
        }

        warn!(
            status = status.as_u16(),
            error = %token_response.error,
            error_description = %token_response.error_description,
            "Token endpoint rejected authorization code"
        );

        Err(OAuthError::Protocol {
            status: status.as_u16(),
            error: token_response.error,
            description: token_response.error_description,
        })
    }
}

/// Parse `raw`, require a host and point it at `path`.
///
/// Inputs that only fail for lack of a host (`""`, `"https://"`, a bare
/// `"auth.example.com"`) report `MissingHost`, like URLs that parse without one.
fn endpoint_url(raw: &str, path: &str) -> Result<Url> {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::EmptyHost | url::ParseError::RelativeUrlWithoutBase) => {
            return Err(OAuthError::MissingHost)
        }
        Err(err) => return Err(OAuthError::InvalidUrl(err)),
    };

    if url.host_str().map_or(true, str::is_empty) {
        return Err(OAuthError::MissingHost);
    }

    url.set_path(path);
    url.set_fragment(None);

    Ok(url)
}

/// Copy of `url` without userinfo, for log output
fn without_credentials(url: &Url) -> Url {
    let mut url = url.clone();
    // Only fails for URLs without a host, which `endpoint_url` already rejects
    let _ = url.set_password(None);
    let _ = url.set_username("");
    url
}
