use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::news::markup::{KNOWN_TAGS, html_escape};

use super::traits::{Rule, RuleContext};

static BRACKET_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?P<token>[^\[\]/\n][^\[\]\n]*)\]").expect("bracket token regex")
});

/// Whether `token` (the text between brackets) names a tag the pipeline owns.
pub fn is_known_tag(token: &str) -> bool {
    let name = token
        .trim()
        .split(|c: char| c == '=' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    KNOWN_TAGS.contains(&name.as_str())
}

/// Update notes group changes under `[MAPS]`, `[GAMEPLAY]` and similar
/// headers. Whatever bracket token survived the specific rules is one of those.
pub struct SectionHeaders;

impl Rule for SectionHeaders {
    fn name(&self) -> &'static str {
        "section-headers"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        BRACKET_TOKEN_RE
            .replace_all(input, |caps: &Captures| {
                let token = caps["token"].trim();
                if token.is_empty() || is_known_tag(token) {
                    return caps[0].to_string();
                }
                format!(
                    r#"<div class="bb-section-header">{}</div>"#,
                    html_escape(token)
                )
            })
            .into_owned()
    }
}
