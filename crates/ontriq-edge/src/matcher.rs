//! Request matcher
//!
//! The gate runs on every request except internal asset routes, static
//! files by extension, and well-known SEO files. Expressed as explicit
//! predicates rather than per-route registration.

/// Well-known files the gate never inspects
const EXCLUDED_FILES: &[&str] = &[
    "/favicon.ico",
    "/robots.txt",
    "/sitemap.xml",
    "/manifest.json",
];

/// Internal static-asset prefix
const STATIC_PREFIX: &str = "/static/";

/// File extensions served as static assets
const STATIC_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "ico", "css", "js", "map", "txt", "xml",
];

/// True when the edge gate should inspect this path
pub fn gate_applies(path: &str) -> bool {
    if EXCLUDED_FILES.contains(&path) {
        return false;
    }
    if path.starts_with(STATIC_PREFIX) {
        return false;
    }
    !has_static_extension(path)
}

fn has_static_extension(path: &str) -> bool {
    let Some(segment) = path.rsplit('/').next() else {
        return false;
    };
    let Some((_, extension)) = segment.rsplit_once('.') else {
        return false;
    };
    STATIC_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}
