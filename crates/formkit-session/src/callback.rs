use thiserror::Error;

/// Why a redirect callback failed to yield a session. All of these are
/// recoverable login failures: the user stays unauthenticated and may retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallbackError {
    #[error("callback URL carries no fragment or query parameters")]
    MissingParams,
    #[error("callback URL is missing an access token")]
    MissingToken,
    #[error("callback URL is missing an expiry")]
    MissingExpiry,
    #[error("callback expiry is not a positive number of seconds: {0:?}")]
    InvalidExpiry(String),
}

/// Credentials lifted out of an implicit-grant redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub access_token: String,
    /// Seconds from now until the token expires.
    pub expires_in: i64,
}

/// Parse an implicit-grant redirect URL.
///
/// The token parameters live in the URL fragment (`/callback#access_token=…
/// &expires_in=3600`); some providers fall back to the query string, so the
/// query is read when no fragment is present. Unknown parameters are
/// ignored. Values are taken verbatim: implicit-grant tokens are URL-safe
/// by construction.
pub fn parse_callback(url: &str) -> Result<CallbackParams, CallbackError> {
    let params = url
        .split_once('#')
        .map(|(_, fragment)| fragment)
        .or_else(|| url.split_once('?').map(|(_, query)| query))
        .ok_or(CallbackError::MissingParams)?;

    let mut access_token = None;
    let mut expires_in = None;
    for pair in params.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "access_token" => access_token = Some(value),
            "expires_in" => expires_in = Some(value),
            _ => {}
        }
    }

    let token = access_token
        .filter(|token| !token.is_empty())
        .ok_or(CallbackError::MissingToken)?;
    let raw = expires_in.ok_or(CallbackError::MissingExpiry)?;
    let seconds: i64 = raw
        .parse()
        .map_err(|_| CallbackError::InvalidExpiry(raw.to_string()))?;
    if seconds <= 0 {
        return Err(CallbackError::InvalidExpiry(raw.to_string()));
    }

    Ok(CallbackParams {
        access_token: token.to_string(),
        expires_in: seconds,
    })
}
