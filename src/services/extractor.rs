// src/services/extractor.rs

//! Video link extraction from post comments.
//!
//! Comments arrive as HTML. Long URLs are broken up with `<wbr>` and lines
//! with `<br>`, so the markup is flattened first: `<wbr>` vanishes, `<br>`
//! becomes a space, every other tag is unwrapped to its text. The result is
//! split on whitespace and each token tried as a video URL.

use scraper::{Html, Node};
use url::Url;

use crate::models::VideoId;

/// Canonical domain of the video service.
const VIDEO_DOMAIN: &str = "youtube.com";
/// Short-link domain of the video service.
const SHORT_DOMAIN: &str = "youtu.be";

/// Extract every video identifier linked in `comment`.
///
/// The markup is flattened up front; tokens are parsed one at a time as the
/// iterator is advanced. Duplicates are not removed.
pub fn extract_video_ids(comment: &str) -> impl Iterator<Item = VideoId> + use<> {
    let text = flatten_markup(comment);
    let mut cursor = 0;
    std::iter::from_fn(move || {
        loop {
            let rest = &text[cursor..];
            let start = rest.find(|c: char| !c.is_whitespace())?;
            let token = &rest[start..];
            let len = token.find(char::is_whitespace).unwrap_or(token.len());
            cursor += start + len;
            if let Some(id) = parse_video_url(&token[..len]) {
                return Some(id);
            }
        }
    })
}

/// Flatten comment HTML into plain text.
pub fn flatten_markup(comment: &str) -> String {
    let fragment = Html::parse_fragment(comment);
    let mut text = String::with_capacity(comment.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(element) if element.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Parse a single whitespace-free token as a video URL.
///
/// Accepted shapes:
/// - `youtube.com/watch?v=ID`
/// - `youtube.com/embed/ID`, `youtube.com/v/ID`
/// - `youtu.be/ID`
///
/// A scheme is added to tokens starting with `www.` or `youtu`.
pub fn parse_video_url(token: &str) -> Option<VideoId> {
    let candidate = if token.starts_with("www") || token.starts_with("youtu") {
        format!("http://{token}")
    } else {
        token.to_string()
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    if host_matches(&host, VIDEO_DOMAIN) {
        if url.path() == "/watch" {
            let (_, id) = url.query_pairs().find(|(key, _)| key == "v")?;
            return VideoId::parse_prefix(&id);
        }
        let mut segments = url.path_segments()?;
        return match segments.next() {
            Some("embed" | "v") => VideoId::parse_prefix(segments.next()?),
            _ => None,
        };
    }

    if host_matches(&host, SHORT_DOMAIN) {
        let id = url.path().strip_prefix('/')?;
        return VideoId::parse_prefix(id);
    }

    None
}

/// `host` is `domain` or one of its subdomains.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}
