use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::traits::{Rule, RuleContext};

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[code\](.*?)\[/code\]").expect("code block regex"));

pub struct CodeBlocks;

impl Rule for CodeBlocks {
    fn name(&self) -> &'static str {
        "code"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        CODE_RE
            .replace_all(input, |caps: &Captures| {
                // Brackets become entities so later rules leave the block verbatim.
                let body = caps[1].trim().replace('[', "&#91;").replace(']', "&#93;");
                format!(r#"<pre class="bb-code"><code>{body}</code></pre>"#)
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::config::FormatterConfig;

    #[test]
    fn code_is_trimmed_and_shielded() {
        let config = FormatterConfig::default();
        let mut ctx = RuleContext::new(&config);
        assert_eq!(
            CodeBlocks.apply("[code]\n  bind [MOUSE1] +attack\n[/code]", &mut ctx),
            r#"<pre class="bb-code"><code>bind &#91;MOUSE1&#93; +attack</code></pre>"#
        );
    }
}
