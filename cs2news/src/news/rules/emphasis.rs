use once_cell::sync::Lazy;
use regex::Regex;

use crate::news::markup::{char_after, char_before, replace_guarded};

use super::traits::{Rule, RuleContext};

static SPANS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("i", "em"),
        ("b", "strong"),
        ("u", "u"),
        ("strike", "s"),
        ("s", "s"),
    ]
    .into_iter()
    .map(|(tag, element)| {
        let re = Regex::new(&format!(r"(?is)\[{tag}\](.*?)\[/{tag}\]")).expect("emphasis regex");
        (re, element)
    })
    .collect()
});

// `i some words /i`, a bracketless italic left behind by older feeds.
static LEGACY_ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"i[ \t]+(?P<text>[^\n]+?)[ \t]*/i").expect("legacy italic regex"));

pub struct Emphasis;

impl Rule for Emphasis {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        let mut out = input.to_string();
        for (re, element) in SPANS.iter() {
            out = re
                .replace_all(&out, format!("<{element}>$1</{element}>").as_str())
                .into_owned();
        }

        replace_guarded(
            &LEGACY_ITALIC_RE,
            &out,
            |text, caps| {
                let Some(whole) = caps.get(0) else {
                    return false;
                };
                let free_start = char_before(text, whole.start())
                    .map(|c| !c.is_alphanumeric() && !matches!(c, '_' | '<' | '/'))
                    .unwrap_or(true);
                let end_char = char_before(text, whole.end() - 2);
                let free_end = end_char != Some('<')
                    && char_after(text, whole.end())
                        .map(|c| !c.is_alphanumeric() && c != '>' && c != ']')
                        .unwrap_or(true);
                free_start && free_end
            },
            |caps| format!("<em>{}</em>", &caps["text"]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::config::FormatterConfig;

    fn run(input: &str) -> String {
        let config = FormatterConfig::default();
        let mut ctx = RuleContext::new(&config);
        Emphasis.apply(input, &mut ctx)
    }

    #[test]
    fn bracketed_spans() {
        assert_eq!(
            run("[b]bold[/b] [i]it[/i] [u]under[/u] [strike]gone[/strike] [s]x[/s]"),
            "<strong>bold</strong> <em>it</em> <u>under</u> <s>gone</s> <s>x</s>"
        );
    }

    #[test]
    fn spans_may_cross_lines() {
        assert_eq!(run("[B]a\nb[/B]"), "<strong>a\nb</strong>");
    }

    #[test]
    fn legacy_italic_at_word_boundaries() {
        assert_eq!(run("i Note: servers restart /i"), "<em>Note: servers restart</em>");
        assert_eq!(run("Fixed i/o in /inventory"), "Fixed i/o in /inventory");
        assert_eq!(run("taxi drivers /i"), "taxi drivers /i");
    }

    #[test]
    fn legacy_italic_after_markup() {
        assert_eq!(run("[b]i note /i[/b]"), "<strong><em>note</em></strong>");
        assert_eq!(run("[*]i servers restart /i"), "[*]<em>servers restart</em>");
        assert_eq!(run("(i aside /i)"), "(<em>aside</em>)");
    }

    #[test]
    fn legacy_italic_skips_html_closers() {
        let input = "hi there</i>";
        assert_eq!(run(input), input);
    }
}
