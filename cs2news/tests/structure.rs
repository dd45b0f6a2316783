use cs2news::format;
use cs2news::news::rules::repair::structure_counts;
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "[list]", "[/list]", "[ul]", "[/ul]", "[ol]", "[/ol]", "[olist]", "[/olist]", "[*]",
        "[li]", "[/li]", "<ul>", "</ul>", "<li>", "</li>", "<ol start=\"2\">", "</ol>", "text ",
        "\n", "[b]", "[/b]", "[MAPS]", "[img]a.png[/img]", "[carousel]", "[/carousel]",
        "[quote]", "[/quote]", "[code]", "[/code]",
    ])
}

proptest! {
    #[test]
    fn list_structure_is_always_balanced(parts in prop::collection::vec(fragment(), 0..40)) {
        let html = format(parts.concat().as_str());
        let (items, lists) = structure_counts(&html);
        prop_assert_eq!(items.0, items.1);
        prop_assert_eq!(lists.0, lists.1);
    }

    #[test]
    fn arbitrary_text_never_panics(input in ".{0,200}") {
        let _ = format(input.as_str());
        let _ = cs2news::extract_images(&input);
        let _ = cs2news::preview(&input);
    }
}
