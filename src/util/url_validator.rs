use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors from validating the todos API base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// Credentials embedded in the URL are not supported.
    #[error("Credentials in the base URL are not supported")]
    EmbeddedCredentials,
    /// A base URL must not carry a query string or fragment.
    #[error("Base URL must not contain a query or fragment")]
    QueryOrFragment,
}

/// Validate and normalize the base URL all todo endpoints are resolved against.
///
/// The returned URL always ends in `/`, so `base.join("todos")` appends to the
/// path instead of replacing its last segment.
///
/// ```
/// use todoterm::util::validate_base_url;
///
/// let url = validate_base_url("https://example.com/students-api").unwrap();
/// assert_eq!(url.join("todos").unwrap().as_str(), "https://example.com/students-api/todos");
///
/// assert!(validate_base_url("ftp://example.com").is_err());
/// assert!(validate_base_url("https://example.com/api?x=1").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    if host.is_empty() {
        return Err(UrlValidationError::MissingHost);
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::EmbeddedCredentials);
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::QueryOrFragment);
    }

    if url.scheme() == "http" && !is_local_host(host) {
        tracing::warn!(url = %url, "Using plain HTTP for a non-local todos API");
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn is_local_host(host: &str) -> bool {
    if host == "localhost" {
        return true;
    }
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false)
}
