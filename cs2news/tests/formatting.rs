//! End-to-end checks for the formatter, the media extractor and the preview reducer.

use cs2news::news::rules::repair::structure_counts;
use cs2news::news::rules::carousel::EMPTY_GALLERY_TEXT;
use cs2news::{extract_images, format, format_document, preview};

const PATCH_NOTES: &str = "[h1]Counter-Strike 2 Update[/h1]\r\n\
[MAPS]\r\n\
[list]\r\n\
[*]Fixed a bug where [b]Anubis[/b] water was missing\r\n\
[*]See [url=https://counter-strike.net/news]the blog[/url]\r\n\
[/list]\r\n\
[img]{STEAM_CLAN_IMAGE}/3381077/banner.png[/img]\r\n\
[carousel][img]https://a/1.png[/img][img]https://a/2.png[/img][img]https://a/1.png[/img][/carousel]\r\n\
[video webm=\"https://a/clip.webm\" poster=\"https://a/poster.jpg\"][/video]\r\n\
[MISC]\r\n\
[olist][li]Updated textures[/olist]";

fn assert_balanced(html: &str) {
    let (items, lists) = structure_counts(html);
    assert_eq!(items.0, items.1, "item tags unbalanced: {html}");
    assert_eq!(lists.0, lists.1, "list tags unbalanced: {html}");
}

#[test]
fn full_announcement_renders() {
    let doc = format_document(PATCH_NOTES);
    let html = &doc.html;

    assert!(!html.contains('\r'));
    assert!(html.contains(r#"<h1 class="bb-heading bb-size-3">Counter-Strike 2 Update</h1>"#));
    assert!(html.contains(r#"<div class="bb-section-header">MAPS</div>"#));
    assert!(html.contains(r#"<div class="bb-section-header">MISC</div>"#));
    assert!(html.contains("<li>Fixed a bug where <strong>Anubis</strong> water was missing</li>"));
    assert!(html.contains(r#"href="https://counter-strike.net/news""#));
    assert!(html.contains(
        r#"<img src="https://clan.akamai.steamstatic.com/images/3381077/banner.png""#
    ));
    assert!(html.contains(r#"poster="https://a/poster.jpg""#));
    assert!(html.contains(r#"<ol class="bb-list"><li>Updated textures</li></ol>"#));
    assert_balanced(html);

    assert_eq!(doc.carousels.len(), 1);
    assert_eq!(
        doc.carousels[0].images,
        vec!["https://a/1.png", "https://a/2.png", "https://a/1.png"]
    );
    assert_eq!(html.matches(&doc.carousels[0].id).count(), 2);
}

#[test]
fn formatting_is_deterministic() {
    assert_eq!(format_document(PATCH_NOTES), format_document(PATCH_NOTES));
}

#[test]
fn extraction_survives_formatting() {
    let mut raw = extract_images(PATCH_NOTES);
    let mut formatted = extract_images(&format(PATCH_NOTES));
    raw.sort();
    formatted.sort();
    assert_eq!(raw, formatted);
    assert_eq!(raw.len(), 4);
}

#[test]
fn extraction_dedups_preserving_order() {
    assert_eq!(
        extract_images("[img]https://a/1.png[/img][img]https://a/1.png[/img][img]https://a/2.png[/img]"),
        vec!["https://a/1.png", "https://a/2.png"]
    );
}

#[test]
fn gallery_degrades_by_image_count() {
    let none = format_document("[carousel]soon[/carousel]");
    assert_eq!(none.html, EMPTY_GALLERY_TEXT);
    assert!(none.carousels.is_empty());

    let one = format_document("[carousel][img]https://a/1.png[/img][/carousel]");
    assert!(one.html.starts_with(r#"<img src="https://a/1.png""#));
    assert!(!one.html.contains("data-carousel-id"));
    assert!(one.carousels.is_empty());
}

#[test]
fn bold_wraps_exactly_hello() {
    assert_eq!(format("[b]Hello[/b] world"), "<strong>Hello</strong> world");
}

#[test]
fn list_without_opener_still_balances() {
    let html = format("[*]one[*]two[/list]");
    assert_balanced(&html);
    assert!(html.contains("<li>one</li>"));
    assert!(html.contains("<li>two</li>"));
}

#[test]
fn unclosed_li_wrappers_balance() {
    let html = format("[list][li]a[li]b[list][*]c");
    assert_balanced(&html);
}

#[test]
fn empty_input() {
    assert_eq!(format(""), "");
    assert_eq!(format(None), "");
    assert!(extract_images("").is_empty());
    assert_eq!(preview(""), "");
}

#[test]
fn long_preview_is_cut_at_200_chars() {
    let mut body = String::from("[MAPS]\n");
    for n in 0..30 {
        body.push_str(&format!("• Fixed bug number {n}\n"));
    }
    body.push_str("[MISC]\n• Updated textures ...");

    let out = preview(&body);
    assert!(out.ends_with("..."));
    assert_eq!(out.chars().count(), 203);
    assert!(out.starts_with("Fixed bug number 0 Fixed bug number 1"));
    assert!(!out.contains('[') && !out.contains('•') && !out.contains('\n'));
}

#[test]
fn ordered_list_keeps_its_own_closer() {
    let html = format("[ol][*]a[/list]");
    assert_eq!(html, r#"<ol class="bb-list"><li>a</li></ol>"#);
    assert!(!html.contains("</ul>"));
}

#[test]
fn legacy_forms_convert_inside_markup() {
    assert!(format("[list][*]i servers restart /i[/list]")
        .contains("<li><em>servers restart</em></li>"));
    assert_eq!(format("[b]i note /i[/b]"), "<strong><em>note</em></strong>");
    assert!(format("[list][*]url=https://a.b/x Read notes /url[/list]")
        .contains(r#"<li><a href="https://a.b/x" target="_blank" rel="noopener noreferrer">Read notes</a></li>"#));
}

#[test]
fn unclosed_image_tag_is_kept() {
    assert_eq!(format("see [img] here"), "see [img] here");
    assert!(extract_images("see [img] here").is_empty());
}
