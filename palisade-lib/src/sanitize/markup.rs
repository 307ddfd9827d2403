//! Discovery-link trimming for generated HTML head sections.
//!
//! The upstream CMS advertises feeds, its API root, shortlinks and its own
//! version inside `<head>`. The trimmer drops a fixed denylist of link
//! relations and keeps everything else byte-identical, so re-trimming an
//! already trimmed document is a no-op.

/// A head-section link element, reduced to the attributes the denylist
/// cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTag {
    pub rel: String,
    pub media_type: Option<String>,
    pub href: String,
}

impl LinkTag {
    pub fn new(rel: &str, media_type: Option<&str>, href: &str) -> Self {
        Self {
            rel: rel.to_string(),
            media_type: media_type.map(str::to_string),
            href: href.to_string(),
        }
    }
}

/// Relations removed outright, regardless of media type
const DENIED_RELATIONS: &[&str] = &[
    "shortlink",
    "prev",
    "next",
    "generator",
    "edituri",
    "wlwmanifest",
    "https://api.w.org/",
];

/// `rel="alternate"` variants that advertise syndication or oEmbed
const DENIED_ALTERNATE_TYPES: &[&str] = &[
    "application/rss+xml",
    "application/atom+xml",
    "application/rdf+xml",
    "application/json+oembed",
    "text/xml+oembed",
];

/// Whether a link tag falls under the denylist
pub fn is_denied(tag: &LinkTag) -> bool {
    let rel = tag.rel.to_ascii_lowercase();
    if DENIED_RELATIONS.contains(&rel.as_str()) {
        return true;
    }
    if rel == "alternate" {
        if let Some(media_type) = &tag.media_type {
            let lowered = media_type.to_ascii_lowercase();
            return DENIED_ALTERNATE_TYPES.contains(&lowered.as_str());
        }
    }
    false
}

/// Remove denylisted tags, preserving the relative order of the rest
pub fn filter_links(tags: Vec<LinkTag>) -> Vec<LinkTag> {
    tags.into_iter().filter(|tag| !is_denied(tag)).collect()
}

/// Trim denylisted `<link>` elements and the generator `<meta>` tag from
/// an HTML document's head section
///
/// Only the region before `</head>` is rewritten; the rest of the
/// document is copied through untouched. A tag removal also swallows the
/// line break that followed it, so trimming does not leave blank lines.
pub fn trim_head(html: &str) -> String {
    // Case-insensitive scanning runs against a single lowercased copy;
    // ASCII lowercasing preserves byte offsets into the original.
    let lowered = html.to_ascii_lowercase();
    let head_end = lowered.find("</head>").unwrap_or(html.len());
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some((start, end)) = next_candidate(&lowered, pos, head_end) {
        out.push_str(&html[pos..start]);
        let tag_src = &html[start..end];
        if should_drop(tag_src) {
            pos = skip_line_break(html, end);
        } else {
            out.push_str(tag_src);
            pos = end;
        }
    }

    out.push_str(&html[pos..]);
    out
}

/// Find the next complete `<link ...>` or `<meta ...>` element starting
/// before `limit`. Scans a prelowered copy of the document; returns byte
/// offsets of the tag including the closing angle bracket.
fn next_candidate(lowered: &str, from: usize, limit: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while search < limit {
        let window = &lowered[search..limit];
        let link = window.find("<link").map(|i| search + i);
        let meta = window.find("<meta").map(|i| search + i);
        let start = match (link, meta) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return None,
        };

        // Tag name must be delimited, not a prefix of a longer name
        let after_name = start + 5;
        let delimited = lowered[after_name..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_whitespace() || c == '/' || c == '>');
        if !delimited {
            search = after_name;
            continue;
        }

        match lowered[start..].find('>') {
            Some(close) => return Some((start, start + close + 1)),
            // Unterminated tag: leave the remainder untouched
            None => return None,
        }
    }
    None
}

fn should_drop(tag_src: &str) -> bool {
    let lowered = tag_src.to_ascii_lowercase();

    if lowered.starts_with("<meta") {
        return attr_value(tag_src, "name")
            .is_some_and(|name| name.eq_ignore_ascii_case("generator"));
    }

    let tag = LinkTag {
        rel: attr_value(tag_src, "rel").unwrap_or_default(),
        media_type: attr_value(tag_src, "type"),
        href: attr_value(tag_src, "href").unwrap_or_default(),
    };
    is_denied(&tag)
}

/// Pull a single attribute value out of a raw tag. Handles double-quoted,
/// single-quoted and bare values; ASCII-case-insensitive attribute names.
fn attr_value(tag_src: &str, name: &str) -> Option<String> {
    let lowered = tag_src.to_ascii_lowercase();
    let needle = format!("{name}=");
    let mut search = 0;

    while let Some(found) = lowered[search..].find(&needle) {
        let at = search + found;
        let preceded_by_space = tag_src[..at]
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_whitespace());
        if !preceded_by_space {
            search = at + needle.len();
            continue;
        }

        let rest = &tag_src[at + needle.len()..];
        let value = if let Some(quoted) = rest.strip_prefix('"') {
            quoted.split('"').next().unwrap_or("")
        } else if let Some(quoted) = rest.strip_prefix('\'') {
            quoted.split('\'').next().unwrap_or("")
        } else {
            rest.split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or("")
        };
        return Some(value.to_string());
    }
    None
}

fn skip_line_break(html: &str, pos: usize) -> usize {
    let rest = &html[pos..];
    if let Some(stripped) = rest.strip_prefix("\r\n") {
        html.len() - stripped.len()
    } else if let Some(stripped) = rest.strip_prefix('\n') {
        html.len() - stripped.len()
    } else {
        pos
    }
}
