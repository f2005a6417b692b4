use regex::Regex;
use std::sync::OnceLock;

static TAG_RE: OnceLock<Regex> = OnceLock::new();

/// Strips `<...>` tag markup and trims surrounding whitespace. Entities are
/// left as-is.
pub fn clean_html(raw_html: &str) -> String {
    let re = TAG_RE.get_or_init(|| Regex::new("<.*?>").expect("valid tag regex"));
    re.replace_all(raw_html, "").trim().to_string()
}
