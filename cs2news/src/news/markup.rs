use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder Steam uses in announcement bodies for its clan image CDN.
pub const CLAN_IMAGE_TOKEN: &str = "{STEAM_CLAN_IMAGE}";

/// Tag names the rule pipeline understands. Anything else in brackets is a
/// section header; the preview reducer strips the same vocabulary.
pub const KNOWN_TAGS: &[&str] = &[
    "url", "b", "i", "u", "s", "strike", "quote", "code", "carousel", "color", "size", "h1", "h2",
    "h3", "h4", "h5", "h6", "list", "ul", "ol", "olist", "li", "*", "img", "video", "p", "hr",
    "spoiler",
];

/// Every bracket image form: `[img]url[/img]`, `[img=url]` and `[img src="url"]`,
/// the last two with an optional `[/img]`. A bare `[img]` without its closer
/// is not an image.
pub static BRACKET_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\[img(?:(?P<attrs>[=\s][^\]]*)\](?:(?P<body>[^\[]*)\[/img\])?|\](?P<inner>[^\[]*)\[/img\])",
    )
    .expect("bracket image regex")
});

/// Literal `<img>` elements with a `src` attribute.
pub static LITERAL_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*["'](?P<src>[^"']*)["'][^>]*>"#)
        .expect("literal image regex")
});

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<name>[A-Za-z_][\w-]*)(?:\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"'>\]]+)))?"#)
        .expect("attribute regex")
});

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape a value for a double-quoted attribute. Square brackets are encoded
/// too so later bracket rules never see attribute content.
pub fn escape_attribute(s: &str) -> String {
    html_escape(s).replace('[', "&#91;").replace(']', "&#93;")
}

pub fn unescape_attribute(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Parse `name="value"`, `name='value'`, `name=value` and bare `name` pairs.
/// Names are lowercased; bare names get an empty value.
pub fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE_RE
        .captures_iter(raw)
        .map(|cap| {
            let name = cap["name"].to_ascii_lowercase();
            let value = cap
                .name("dq")
                .or_else(|| cap.name("sq"))
                .or_else(|| cap.name("bare"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

pub fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Interpret a boolean attribute. A bare attribute counts as `true`.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => default,
        Some(v) => match v.as_str() {
            "" | "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        },
    }
}

/// Trim a media reference, drop it when empty and expand the clan image placeholder.
pub fn resolve_media_url(raw: &str, clan_image_base: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(CLAN_IMAGE_TOKEN) {
        return Some(trimmed.replace(CLAN_IMAGE_TOKEN, clan_image_base.trim_end_matches('/')));
    }
    Some(trimmed.to_string())
}

/// The URL carried by a [`BRACKET_IMAGE_RE`] match, unresolved.
pub fn bracket_image_source(cap: &Captures) -> String {
    if let Some(attrs) = cap.name("attrs").map(|m| m.as_str()) {
        if let Some(value) = attrs.strip_prefix('=') {
            return value.trim().to_string();
        }
        let parsed = parse_attributes(attrs);
        if let Some(src) = attribute(&parsed, "src") {
            return src.to_string();
        }
    }
    cap.name("body")
        .or_else(|| cap.name("inner"))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn image_element(src: &str) -> String {
    format!(
        r#"<img src="{}" alt="" class="bb-image" loading="lazy">"#,
        escape_attribute(src)
    )
}

/// Replace every match of `re` that `accept` approves.
///
/// Rejected matches are retried one character later, so a refused candidate
/// never hides an overlapping one. This is how word-boundary guards are written
/// without lookaround.
pub fn replace_guarded<A, F>(re: &Regex, text: &str, accept: A, mut replace: F) -> String
where
    A: Fn(&str, &Captures) -> bool,
    F: FnMut(&Captures) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;

    while pos <= text.len() {
        let Some(cap) = re.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = cap.get(0) else {
            break;
        };

        if accept(text, &cap) {
            out.push_str(&text[last..whole.start()]);
            out.push_str(&replace(&cap));
            last = whole.end();
            pos = if whole.end() > whole.start() {
                whole.end()
            } else {
                next_boundary(text, whole.end())
            };
        } else {
            pos = next_boundary(text, whole.start());
        }
    }

    out.push_str(&text[last..]);
    out
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map(|c| at + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

pub fn char_before(text: &str, at: usize) -> Option<char> {
    text[..at].chars().next_back()
}

pub fn char_after(text: &str, at: usize) -> Option<char> {
    text[at..].chars().next()
}
