//! Rewrites file-hosting share links into direct-view links so images can be
//! embedded. Anything that is not a recognised share link passes through.

use lazy_static::lazy_static;
use regex::Regex;

/// Direct-view URL template; `{id}` is replaced by the file identifier
pub const DIRECT_VIEW_TEMPLATE: &str = "https://drive.google.com/uc?export=view&id={id}";

lazy_static! {
    static ref SHARE_LINK_PATTERN: Regex =
        Regex::new(r"^https?://drive\.google\.com/file/d/(?P<id>[A-Za-z0-9_-]+)(?:/[^?#]*)?(?:[?#].*)?$")
            .expect("Invalid share link regex pattern");
}

/// Extract the file identifier from a share link
pub fn share_link_id(url: &str) -> Option<&str> {
    SHARE_LINK_PATTERN
        .captures(url.trim())
        .and_then(|caps| caps.name("id"))
        .map(|id| id.as_str())
}

/// Convert a share link into its direct-view form
pub fn to_direct_view(url: &str) -> String {
    match share_link_id(url) {
        Some(id) => DIRECT_VIEW_TEMPLATE.replace("{id}", id),
        None => url.trim().to_string(),
    }
}
