use url::Url;

/// Normalizes a URL to the site key used by the handler registry
///
/// The key keeps only the scheme and the host (plus an explicit non-default
/// port), so a single registration covers every page of a site. Hosts are
/// lowercased by the URL parser.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use news_harvester::url::site_key;
///
/// let url = Url::parse("https://G1.Globo.com/economia/noticia/x.ghtml?a=1#top").unwrap();
/// assert_eq!(site_key(&url), "https://g1.globo.com/");
/// ```
pub fn site_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> String {
        site_key(&Url::parse(raw).unwrap())
    }

    #[test]
    fn test_root_url() {
        assert_eq!(key("https://www.bbc.com/"), "https://www.bbc.com/");
    }

    #[test]
    fn test_path_query_and_fragment_are_dropped() {
        assert_eq!(
            key("https://www.cnnbrasil.com.br/politica/?page=2#more"),
            "https://www.cnnbrasil.com.br/"
        );
    }

    #[test]
    fn test_host_is_lowercased() {
        assert_eq!(key("https://NOTICIAS.R7.COM/brasil"), "https://noticias.r7.com/");
    }

    #[test]
    fn test_scheme_is_part_of_key() {
        assert_ne!(key("http://g1.globo.com/"), key("https://g1.globo.com/"));
    }

    #[test]
    fn test_explicit_port_is_kept() {
        assert_eq!(key("http://127.0.0.1:4010/listing"), "http://127.0.0.1:4010/");
    }

    #[test]
    fn test_default_port_is_dropped() {
        assert_eq!(key("https://g1.globo.com:443/"), "https://g1.globo.com/");
    }

    #[test]
    fn test_www_is_not_stripped() {
        assert_ne!(key("https://www.bbc.com/"), key("https://bbc.com/"));
    }
}
