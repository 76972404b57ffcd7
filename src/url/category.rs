use url::Url;

/// Suffix the site appends to every listing and article path
const PAGE_SUFFIX: &str = ".htm";

/// Builds the URL of a listing page
///
/// Page 1 is the category URL itself. Later pages drop a trailing slash and
/// the `.htm` suffix, then append `/trang-N.htm`, which is the routing the
/// site uses for paginated listings.
///
/// # Examples
///
/// ```
/// use tuoitre_harvester::url::page_url;
///
/// assert_eq!(page_url("https://tuoitre.vn/thoi-su.htm", 1), "https://tuoitre.vn/thoi-su.htm");
/// assert_eq!(page_url("https://tuoitre.vn/thoi-su.htm", 3), "https://tuoitre.vn/thoi-su/trang-3.htm");
/// ```
pub fn page_url(category_url: &str, page: u32) -> String {
    if page <= 1 {
        return category_url.to_string();
    }

    let trimmed = category_url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(PAGE_SUFFIX).unwrap_or(trimmed);
    format!("{}/trang-{}{}", trimmed, page, PAGE_SUFFIX)
}

/// Derives the category slug from a listing URL
///
/// The slug is the first path segment without its `.htm` suffix, or
/// `"unknown"` when the URL has no path.
pub fn category_slug(category_url: &str) -> String {
    let first_segment = Url::parse(category_url).ok().and_then(|url| {
        url.path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
            .map(str::to_string)
    });

    match first_segment {
        Some(segment) => segment
            .strip_suffix(PAGE_SUFFIX)
            .map(str::to_string)
            .unwrap_or(segment),
        None => "unknown".to_string(),
    }
}
