use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::traits::{Rule, RuleContext};

static ITEM_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\*\]").expect("list item marker regex"));
static LIST_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[/(?:list|ul|ol|olist)\]").expect("list close regex"));
static ITEM_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(?P<close>/?)li\]").expect("list item tag regex"));
static LIST_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[(?P<close>/?)(?P<kind>list|ul|olist|ol)\]").expect("list tag regex")
});

/// `[list]`/`[ul]`, `[olist]`/`[ol]`, `[li]` wrappers and `[*]` markers.
///
/// A `[*]` item runs until the next marker, the next list close or the end of
/// the text. Anything left unbalanced is handled by structural repair.
pub struct Lists;

impl Rule for Lists {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        let out = star_items(input);
        let out = ITEM_TAG_RE.replace_all(&out, "<${close}li>").into_owned();
        LIST_TAG_RE
            .replace_all(&out, |caps: &Captures| {
                let element = match caps["kind"].to_ascii_lowercase().as_str() {
                    "ol" | "olist" => "ol",
                    _ => "ul",
                };
                if caps["close"].is_empty() {
                    format!(r#"<{element} class="bb-list">"#)
                } else {
                    format!("</{element}>")
                }
            })
            .into_owned()
    }
}

fn star_items(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 64);
    let mut cursor = 0;

    while let Some(marker) = ITEM_MARKER_RE.find_at(input, cursor) {
        out.push_str(&input[cursor..marker.start()]);

        let body_start = marker.end();
        let next_item = ITEM_MARKER_RE.find_at(input, body_start).map(|m| m.start());
        let next_close = LIST_CLOSE_RE.find_at(input, body_start).map(|m| m.start());
        let body_end = [next_item, next_close]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(input.len());

        out.push_str("<li>");
        out.push_str(input[body_start..body_end].trim());
        out.push_str("</li>");
        cursor = body_end;
    }

    out.push_str(&input[cursor..]);
    out
}
