use once_cell::sync::Lazy;
use regex::Regex;

use crate::news::markup::html_escape;

use super::traits::{Rule, RuleContext};

static QUOTE_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[quote(?:=(?P<author>[^\]]*))?\]").expect("quote open regex"));
static QUOTE_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[/quote\]").expect("quote close regex"));

/// `[quote]..[/quote]` and `[quote=Author]..[/quote]`, innermost pair first so
/// nested quotes keep their structure.
pub struct Quotes;

impl Rule for Quotes {
    fn name(&self) -> &'static str {
        "quotes"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        let mut text = input.to_string();
        let mut cursor = 0;

        while let Some((close_start, close_end)) = QUOTE_CLOSE_RE
            .find_at(&text, cursor)
            .map(|m| (m.start(), m.end()))
        {
            let Some(open) = QUOTE_OPEN_RE.captures_iter(&text[..close_start]).last() else {
                // stray closer, leave it as text
                cursor = close_end;
                continue;
            };

            let (open_start, open_end) = match open.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };
            let author = open
                .name("author")
                .map(|m| clean_author(m.as_str()))
                .filter(|a| !a.is_empty());

            let inner = text[open_end..close_start].trim();
            let block = match author {
                Some(author) => format!(
                    r#"<blockquote class="bb-quote"><div class="bb-quote-author">{} wrote:</div>{}</blockquote>"#,
                    html_escape(&author),
                    inner
                ),
                None => format!(r#"<blockquote class="bb-quote">{inner}</blockquote>"#),
            };

            text.replace_range(open_start..close_end, &block);
            cursor = open_start;
        }

        text
    }
}

/// Steam writes `[quote=Name;123456]`; only the name is shown.
fn clean_author(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
