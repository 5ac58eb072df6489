use http::Uri;
use std::io::{Error, ErrorKind};

pub fn validate_url_target(url: &str) -> Result<Uri, Error> {
  url
    .parse::<Uri>()
    .map_err(|e| Error::new(ErrorKind::InvalidInput, format!("invalid URL: {}", e)))
}

/// Accepts absolute http(s) links and site-relative paths, which is all the
/// storefront renders as `href`/`src`.
pub fn validate_link(url: &str) -> Result<Uri, Error> {
  let uri = validate_url_target(url.trim())?;

  match uri.scheme_str() {
    Some("http") | Some("https") if uri.host().is_some() => Ok(uri),
    None if uri.path().starts_with('/') && uri.authority().is_none() => Ok(uri),
    _ => Err(Error::new(ErrorKind::InvalidInput, format!("unsupported link target: {}", url))),
  }
}
