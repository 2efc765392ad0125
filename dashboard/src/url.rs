//! URL joining
//!
//! Joins path segments into one normalized URL. Slashes between segments are
//! collapsed, the scheme separator is normalized, and the query strings of all
//! segments are merged into a single query placed after the joined path.

/// Join URL segments into a single normalized URL.
///
/// ```
/// use deploydash::url::url_join;
///
/// assert_eq!(url_join(["http://a/", "/b/", "/c"]), "http://a/b/c");
/// assert_eq!(url_join(["http://a", "b?x=1", "c?y=2"]), "http://a/b/c?x=1&y=2");
/// ```
pub fn url_join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<String> = segments
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    // "https:" followed by "//host" is one segment
    if parts.len() > 1 && is_bare_scheme(&parts[0]) {
        let scheme = parts.remove(0);
        parts[0] = format!("{}{}", scheme, parts[0]);
    }
    parts[0] = normalize_scheme(&parts[0]);

    let last = parts.len() - 1;
    let mut paths: Vec<&str> = Vec::with_capacity(parts.len());
    let mut params: Vec<&str> = Vec::new();
    let mut has_query = false;
    let mut fragment: Option<&str> = None;
    let mut trailing_slash = false;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }

        let (rest, frag) = match part.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag)),
            None => (part.as_str(), None),
        };
        if frag.is_some() {
            fragment = frag;
        }

        let (path, query) = match rest.strip_prefix('&') {
            Some(query) if i > 0 => ("", Some(query)),
            _ => match rest.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (rest, None),
            },
        };

        if let Some(query) = query {
            has_query = true;
            params.extend(query.split(['?', '&']).filter(|p| !p.is_empty()));
        }

        if i == last && path.ends_with('/') {
            trailing_slash = true;
        }

        let trimmed = if i > 0 {
            path.trim_matches('/')
        } else {
            path.trim_end_matches('/')
        };

        // keep a leading slash of a root-relative first segment
        if !trimmed.is_empty() || (i == 0 && path.starts_with('/')) {
            paths.push(trimmed);
        }
    }

    let mut url = paths.join("/");
    if trailing_slash && !has_query && fragment.is_none() && !url.ends_with('/') {
        url.push('/');
    }
    if has_query {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Split `scheme:rest` when `scheme` is a plausible URL scheme
fn split_scheme(segment: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = segment.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, rest))
}

fn is_bare_scheme(segment: &str) -> bool {
    match split_scheme(segment) {
        Some((_, rest)) => rest.chars().all(|c| c == '/'),
        None => false,
    }
}

fn normalize_scheme(segment: &str) -> String {
    match split_scheme(segment) {
        Some((scheme, rest)) => {
            let separator = if scheme.eq_ignore_ascii_case("file") {
                ":///"
            } else {
                "://"
            };
            format!("{}{}{}", scheme, separator, rest.trim_start_matches('/'))
        }
        None => segment.to_string(),
    }
}
