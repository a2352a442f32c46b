//! Markup cleaning pipeline tests
//!
//! End-to-end coverage of the staged cleaner: link resolution, trailing
//! section truncation, nested construct removal, section tags, and
//! whitespace finalization.

use wikidump_rs::MarkupCleaner;

#[test]
fn test_cleanup_links_display_text() {
    let cleaner = MarkupCleaner::new();
    assert_eq!(
        cleaner.cleanup_links("[[Albert Einstein|Einstein]] was born"),
        "Einstein was born"
    );
    assert_eq!(cleaner.cleanup_links("[[Relativity]]"), "Relativity");
}

#[test]
fn test_cleanup_links_splits_on_first_pipe() {
    let cleaner = MarkupCleaner::new();
    // first pipe separates target from display text
    assert_eq!(
        cleaner.cleanup_links("[[Target|a|b]]"),
        "a|b"
    );
}

#[test]
fn test_remove_references_section_truncates() {
    let cleaner = MarkupCleaner::new();
    let text = "Prose before.\n== References ==\n* cite1";
    assert_eq!(cleaner.remove_references_section(text), "Prose before.\n");

    let text = "Prose.\n=== Further reading ===\nmore";
    assert_eq!(cleaner.remove_references_section(text), "Prose.\n");
}

#[test]
fn test_depth_tracked_removal_of_nested_templates() {
    let cleaner = MarkupCleaner::new();
    let text = "{{Infobox\n name = Alice\n {{list\n item\n }}\n}}\nHello world";
    let out = cleaner.clean(text);
    assert!(out.contains("Hello world"));
    for gone in ["Infobox", "Alice", "list", "item"] {
        assert!(!out.contains(gone), "{gone:?} should have been removed");
    }
}

#[test]
fn test_table_removed_via_placeholder_pair() {
    let cleaner = MarkupCleaner::new();
    let text = "{| class=wikitable\n| cell one\n| cell two\n|}\nProse after.";
    let out = cleaner.clean(text);
    assert!(out.contains("Prose after."));
    assert!(!out.contains("wikitable"));
    assert!(!out.contains("cell"));
}

#[test]
fn test_section_tags_from_heading_and_main_template() {
    let cleaner = MarkupCleaner::new();
    let out = cleaner.clean("== History ==\n{{Main|Topic A|Topic B}}\nBody text");
    assert!(out.contains("history topic a topic b"));
    let tags_end = out.find("history topic a topic b").unwrap();
    assert!(out[tags_end..].contains("Body text"));
}

#[test]
fn test_section_tags_strip_styling_and_punctuation() {
    let cleaner = MarkupCleaner::new();
    let out = cleaner.clean("== Alice's Life, Works ==\nBody");
    assert!(out.contains("alices life works"));
}

#[test]
fn test_intro_tags_from_short_description() {
    let cleaner = MarkupCleaner::new();
    let out = cleaner.clean("{{Short description|German physicist}}Lead paragraph.");
    assert!(out.starts_with("##tags: German physicist"));
    assert!(out.ends_with("Lead paragraph."));
}

#[test]
fn test_finalize_whitespace_normalization() {
    let cleaner = MarkupCleaner::new();
    assert_eq!(cleaner.finalize("a  b   c"), "a b c");
    assert_eq!(cleaner.finalize("a\n\n\n\nb"), "a\n\nb");
    assert_eq!(cleaner.finalize("  padded  "), "padded");
}

#[test]
fn test_unmatched_delimiters_degrade_gracefully() {
    let cleaner = MarkupCleaner::new();
    // a lone closer is swept up by finalize, never an error
    let out = cleaner.clean("stray }} closer and | pipe");
    assert!(out.contains("stray"));
    assert!(out.contains("closer and"));
    assert!(!out.contains("}}"));
    assert!(!out.contains('|'));
}

#[test]
fn test_full_pipeline_article() {
    let cleaner = MarkupCleaner::new();
    let raw = "{{Short description|Test topic|physics}}Intro prose.<ref>x</ref>\n\n\
               == History ==\n{{Main|Old Things}}\nHistory prose.\n\n\
               == References ==\n* cite";
    assert_eq!(
        cleaner.clean(raw),
        "##tags: Test topic physics \n\nIntro prose. \n\n\
         ##tags: history old things \n\nHistory prose."
    );
}
