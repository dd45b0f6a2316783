use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::news::markup::escape_attribute;

use super::traits::{Rule, RuleContext};

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[color=(?P<value>[^\]]+)\](?P<text>.*?)\[/color\]").expect("color regex")
});
static SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[size=(?P<value>[^\]]+)\](?P<text>.*?)\[/size\]").expect("size regex")
});
static SPOILER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[spoiler\](?P<text>.*?)\[/spoiler\]").expect("spoiler regex")
});
static RULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[hr\](?:\s*\[/hr\])?").expect("hr regex"));
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(?P<close>/?)p\]").expect("paragraph regex"));

/// Map a numeric font size onto the six-step scale shared with headings.
pub fn size_tier(size: f64) -> u8 {
    match size {
        s if s <= 8.0 => 1,
        s if s <= 10.0 => 2,
        s if s <= 12.0 => 3,
        s if s <= 16.0 => 4,
        s if s <= 20.0 => 5,
        _ => 6,
    }
}

/// Colors, font sizes, spoilers, paragraphs and horizontal rules.
pub struct InlineStyles;

impl Rule for InlineStyles {
    fn name(&self) -> &'static str {
        "inline-styles"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        let out = COLOR_RE
            .replace_all(input, |caps: &Captures| {
                format!(
                    r#"<span style="color: {}">{}</span>"#,
                    escape_attribute(caps["value"].trim()),
                    &caps["text"]
                )
            })
            .into_owned();

        let out = SIZE_RE
            .replace_all(&out, |caps: &Captures| {
                let value = caps["value"].trim();
                match value.parse::<f64>() {
                    Ok(size) if size.is_finite() => format!(
                        r#"<span class="bb-size-{}">{}</span>"#,
                        size_tier(size),
                        &caps["text"]
                    ),
                    _ => format!(
                        r#"<span style="font-size: {}">{}</span>"#,
                        escape_attribute(value),
                        &caps["text"]
                    ),
                }
            })
            .into_owned();

        let out = SPOILER_RE
            .replace_all(&out, r#"<span class="bb-spoiler">$text</span>"#)
            .into_owned();
        let out = RULE_RE.replace_all(&out, "<hr>").into_owned();
        PARAGRAPH_RE
            .replace_all(&out, "<${close}p>")
            .into_owned()
    }
}
