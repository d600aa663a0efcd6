use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::de::DeserializeOwned;

use crate::config::Credentials;
use crate::error::{AppError, Result};

const USER_AGENT: &str = concat!("git-lineage/", env!("CARGO_PKG_VERSION"));

pub(crate) fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent()
}

pub(crate) fn authorization(credentials: &Credentials) -> Option<String> {
    match credentials {
        Credentials::Anonymous => None,
        Credentials::Token(token) => Some(format!("Bearer {}", token)),
        Credentials::Basic { user, password } => {
            Some(format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password))))
        }
    }
}

/// GET `url` and decode the JSON body. A 404 is `Ok(None)`; every other
/// failure is a `Tracker` error naming the URL.
pub(crate) fn get_json<T: DeserializeOwned>(
    agent: &ureq::Agent,
    tracker: &'static str,
    url: &str,
    credentials: &Credentials,
) -> Result<Option<T>> {
    let mut req = agent
        .get(url)
        .header("Accept", "application/json")
        .header("User-Agent", USER_AGENT);
    if let Some(auth) = authorization(credentials) {
        req = req.header("Authorization", &auth);
    }

    let response = req.call().map_err(|e| AppError::Tracker {
        tracker,
        message: format!("GET {}: {}", url, e),
    })?;

    let status = response.status().as_u16();
    if status == 404 {
        return Ok(None);
    }
    if status >= 400 {
        let error_text = response.into_body().read_to_string().unwrap_or_default();
        let message = match status {
            401 | 403 => format!("GET {} was refused ({}), check credentials: {}", url, status, error_text),
            _ => format!("GET {} returned {}: {}", url, status, error_text),
        };
        return Err(AppError::Tracker { tracker, message });
    }

    let body = response
        .into_body()
        .read_json::<T>()
        .map_err(|e| AppError::Tracker {
            tracker,
            message: format!("GET {}: unexpected response body: {}", url, e),
        })?;
    Ok(Some(body))
}
