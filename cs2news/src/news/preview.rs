use once_cell::sync::Lazy;
use regex::Regex;

use crate::news::config::DEFAULT_PREVIEW_LENGTH;

// Media constructs are dropped whole so their URLs never reach the summary.
static MEDIA_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[img\][^\[]*\[/img\]|\[video\b[^\]]*\].*?\[/video\]|<video\b.*?</video>")
        .expect("media block regex")
});
static BRACKET_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/?[^\[\]\n]*\]").expect("bracket token regex"));
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("html tag regex"));
// Plain-text list items: `* item`, `- item`.
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[*\-][ \t]+").expect("list marker regex"));

const BULLETS: &[char] = &['•', '◦', '▪', '▫', '●', '○', '‣', '⁃', '∙', '·'];

pub const ELLIPSIS: &str = "...";

/// Plain-text summary of an announcement body for cards.
pub fn preview(description: &str) -> String {
    preview_with_limit(description, DEFAULT_PREVIEW_LENGTH)
}

pub fn preview_with_limit(description: &str, limit: usize) -> String {
    let text = MEDIA_BLOCK_RE.replace_all(description, " ");
    let text = BRACKET_TOKEN_RE.replace_all(&text, " ");
    let text = HTML_TAG_RE.replace_all(&text, " ");
    let text = LIST_MARKER_RE.replace_all(&text, "");
    let text: String = text.chars().filter(|c| !BULLETS.contains(c)).collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_bullets() {
        assert_eq!(
            preview("[MAPS]\n• Fixed a bug on [b]Anubis[/b]\n[MISC]\n• Updated textures"),
            "Fixed a bug on Anubis Updated textures"
        );
    }

    #[test]
    fn ascii_list_markers_are_dropped() {
        assert_eq!(
            preview("[MAPS]\n* Fixed water\n  - Updated textures\n[list][*]- Moved crate[/list]"),
            "Fixed water Updated textures Moved crate"
        );
        assert_eq!(preview("Damage -5% to 3 * 2 targets"), "Damage -5% to 3 * 2 targets");
    }

    #[test]
    fn media_urls_do_not_leak() {
        assert_eq!(
            preview(r#"[img]{STEAM_CLAN_IMAGE}/a.png[/img]Hello [video webm="v.webm"][/video]world"#),
            "Hello world"
        );
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let body = format!("[MAPS]\n• {}\n[MISC]\n• Updated textures", "Fixed bug ".repeat(40));
        let out = preview(&body);
        assert_eq!(out.chars().count(), DEFAULT_PREVIEW_LENGTH + ELLIPSIS.len());
        assert!(out.ends_with(ELLIPSIS));
        assert!(out.starts_with("Fixed bug Fixed bug"));
        assert!(!out.contains('[') && !out.contains('•'));
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(preview("Release notes"), "Release notes");
        assert_eq!(preview(""), "");
    }
}
