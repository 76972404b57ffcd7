use std::path::Path;
use url::Url;

/// Resolves an href against the site origin
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tuoitre_harvester::url::absolutize;
///
/// let base = Url::parse("https://tuoitre.vn").unwrap();
/// assert_eq!(
///     absolutize(&base, "/tin-moi-20240101123456789.htm"),
///     Some("https://tuoitre.vn/tin-moi-20240101123456789.htm".to_string())
/// );
/// assert_eq!(absolutize(&base, "#"), None);
/// ```
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Returns the last path segment of a URL, if it has one
///
/// Query strings and fragments never leak into the name.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path_segments()?.last()?;

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Returns the extension (with leading dot) of the URL's file name
pub fn extension_from_url(url: &str) -> Option<String> {
    let name = filename_from_url(url)?;
    let ext = Path::new(&name).extension()?.to_str()?;

    if ext.is_empty() {
        None
    } else {
        Some(format!(".{}", ext))
    }
}
