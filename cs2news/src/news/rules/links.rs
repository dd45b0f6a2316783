use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::news::markup::{char_after, char_before, escape_attribute, replace_guarded};

use super::traits::{Rule, RuleContext};

static URL_WITH_TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[url=(?P<target>[^\]]+)\](?P<text>.*?)\[/url\]").expect("url regex")
});

static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[url\](?P<target>.*?)\[/url\]").expect("bare url regex"));

// Legacy bodies sometimes lost their brackets: `url=https://x text /url`.
static LEGACY_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)url=(?P<target>[^\s\[\]<>]+)\s+(?P<text>.+?)\s*/url").expect("legacy url regex")
});

const URL_PUNCTUATION: &str = "?&=/.:#%-\"'";

pub struct Links;

impl Rule for Links {
    fn name(&self) -> &'static str {
        "links"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        let out = URL_WITH_TARGET_RE
            .replace_all(input, |caps: &Captures| anchor(&caps["target"], &caps["text"]))
            .into_owned();

        let out = BARE_URL_RE
            .replace_all(&out, |caps: &Captures| anchor(&caps["target"], &caps["target"]))
            .into_owned();

        replace_guarded(
            &LEGACY_URL_RE,
            &out,
            |text, caps| {
                let Some(whole) = caps.get(0) else {
                    return false;
                };
                // Inside a word or a longer URL (`?url=`, `&url=`) it is not a link.
                let opens_cleanly = char_before(text, whole.start())
                    .map(|c| !c.is_alphanumeric() && c != '_' && !URL_PUNCTUATION.contains(c))
                    .unwrap_or(true);
                let closes_cleanly = char_after(text, whole.end())
                    .map(|c| !c.is_alphanumeric())
                    .unwrap_or(true);
                opens_cleanly && closes_cleanly
            },
            |caps| {
                let text = caps["text"].replace('\n', " ");
                anchor(&caps["target"], &text)
            },
        )
    }
}

fn anchor(target: &str, text: &str) -> String {
    let target = target.trim().trim_matches(|c| c == '"' || c == '\'');
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_attribute(target),
        text.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::config::FormatterConfig;

    fn run(input: &str) -> String {
        let config = FormatterConfig::default();
        let mut ctx = RuleContext::new(&config);
        Links.apply(input, &mut ctx)
    }

    #[test]
    fn bracketed_link_with_text() {
        assert_eq!(
            run("see [url=https://counter-strike.net]the blog[/url]."),
            r#"see <a href="https://counter-strike.net" target="_blank" rel="noopener noreferrer">the blog</a>."#
        );
    }

    #[test]
    fn bare_link_uses_target_as_text() {
        assert!(run("[url]https://a.b/c[/url]").contains(r#"href="https://a.b/c""#));
    }

    #[test]
    fn legacy_link_collapses_line_breaks() {
        let html = run("url=https://a.b/patch Read the\nfull notes /url");
        assert_eq!(
            html,
            r#"<a href="https://a.b/patch" target="_blank" rel="noopener noreferrer">Read the full notes</a>"#
        );
    }

    #[test]
    fn legacy_link_after_markup() {
        assert_eq!(
            run("[*]url=https://a.b/x Read notes /url"),
            r#"[*]<a href="https://a.b/x" target="_blank" rel="noopener noreferrer">Read notes</a>"#
        );
        assert!(run("<strong>url=https://a.b/x notes /url</strong>").starts_with(r#"<strong><a href="https://a.b/x""#));
    }

    #[test]
    fn legacy_form_ignores_query_parameters() {
        let input = "https://a.b/?url=https://c.d then /url";
        assert_eq!(run(input), input);
    }
}
