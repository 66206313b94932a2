use crate::UrlError;
use url::Url;

/// Parses a target string into an absolute HTTP(S) URL
///
/// Targets are rejected, never silently repaired: anything that is not an
/// absolute `http://` or `https://` URL with a host is an error, and the
/// executor records it as a failed target without dispatching it.
///
/// # Examples
///
/// ```
/// use news_harvester::url::parse_target;
///
/// assert!(parse_target("https://g1.globo.com/").is_ok());
/// assert!(parse_target("ftp://g1.globo.com/").is_err());
/// assert!(parse_target("/relative/path").is_err());
/// ```
pub fn parse_target(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS targets are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost(trimmed.to_string())),
    }
}
