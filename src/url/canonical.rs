use url::Url;

/// Tracking query parameters stripped from discovered links
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "xtor",
    "at_medium",
    "at_campaign",
];

/// Canonicalizes a discovered article link
///
/// Two anchors pointing at the same article usually differ only in their
/// fragment or in campaign parameters appended by the listing page. This
/// removes both so links can be deduplicated by URL.
///
/// # Canonicalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove tracking query parameters (`utm_*`, `fbclid`, `xtor`, ...)
/// 3. Sort remaining query parameters alphabetically
/// 4. Remove empty query string (trailing ?)
///
/// Scheme, host and path are kept as-is: site keys and article identity
/// depend on them.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use news_harvester::url::canonicalize_link;
///
/// let url = Url::parse("https://g1.globo.com/a.ghtml?utm_source=home#comments").unwrap();
/// assert_eq!(canonicalize_link(&url).as_str(), "https://g1.globo.com/a.ghtml");
/// ```
pub fn canonicalize_link(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    url
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
