//! End-to-end scan, fill and export against in-memory packages

mod common;

use common::{document_xml, member, member_names, paragraphs, raw_member, safe_template, DocxBuilder};
use lexfill_engine::{DocxArchive, EngineConfig, EngineError, PlaceholderEngine, MAIN_DOCUMENT};
use lexfill_domain::PlaceholderRegistry;

fn fill_safe(engine: &PlaceholderEngine, registry: &mut PlaceholderRegistry) {
    let answers = [
        ("investor_name", "Sample Capital LLC"),
        ("amount", "1.25m"),
        ("date_of_safe", "15th September 2025"),
        ("company_name", "AlphaSoft Technologies LTD"),
        ("state_of_incorporation", "Delaware"),
        ("governing_law_jurisdiction", "California"),
        ("company", "ALPHASOFT TECHNOLOGIES LTD"),
        ("name", "Jane Doe"),
        ("title", "Founder & CEO"),
    ];
    for (key, value) in answers {
        engine.fill(registry, key, value).unwrap();
    }
}

fn all_text(package: &[u8]) -> String {
    let archive = DocxArchive::open(package, u64::MAX).unwrap();
    archive.parts().iter().map(|p| p.logical_text()).collect::<Vec<_>>().join("\n")
}

#[test]
fn test_scan_covers_every_text_part() {
    let engine = PlaceholderEngine::default();
    let registry = engine.scan(&safe_template()).unwrap();

    let keys: Vec<&str> = registry.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "investor_name",
            "amount",
            "date_of_safe",
            "company_name",
            "state_of_incorporation",
            "governing_law_jurisdiction",
            "company",
            "name",
            "title",
        ]
    );

    let occurrences = |key: &str| registry.get(key).unwrap().occurrences;
    assert_eq!(occurrences("investor_name"), 2);
    assert_eq!(occurrences("amount"), 2);
    assert_eq!(occurrences("date_of_safe"), 2);
    assert_eq!(occurrences("company_name"), 2);
    assert_eq!(occurrences("title"), 1);
}

#[test]
fn test_split_run_replacement_leaves_neighbours_byte_identical() {
    let before = paragraphs(&[
        &["Signed by ", "[Inv", "estor Na", "me]", " on behalf of the fund."],
        &["Unrelated paragraph with [Other Field] kept."],
    ]);
    let template = DocxBuilder::new()
        .body(&[
            &["Signed by ", "[Inv", "estor Na", "me]", " on behalf of the fund."],
            &["Unrelated paragraph with [Other Field] kept."],
        ])
        .build();
    assert_eq!(member(&template, MAIN_DOCUMENT), document_xml(&before).into_bytes());

    let engine = PlaceholderEngine::default();
    let mut registry = engine.scan(&template).unwrap();
    engine.fill(&mut registry, "investor_name", "Sample Capital LLC").unwrap();
    let exported = engine.export(&template, &registry).unwrap();

    // The value lands in the first run, the middle run is emptied, the last
    // keeps its (empty) suffix; every other byte is as it was.
    let after = paragraphs(&[
        &["Signed by ", "Sample Capital LLC", "", "", " on behalf of the fund."],
        &["Unrelated paragraph with [Other Field] kept."],
    ]);
    assert_eq!(
        String::from_utf8(member(&exported, MAIN_DOCUMENT)).unwrap(),
        document_xml(&after)
    );
}

#[test]
fn test_replacement_keeps_prefix_and_suffix_inside_runs() {
    let template = DocxBuilder::new()
        .body(&[&["Cap: $[Valu", "ation Cap] (post-money)", " only"]])
        .build();

    let engine = PlaceholderEngine::default();
    let mut registry = engine.scan(&template).unwrap();
    engine.fill(&mut registry, "valuation_cap", "8m").unwrap();
    let exported = engine.export(&template, &registry).unwrap();

    let after = paragraphs(&[&["Cap: $8,000,000", " (post-money)", " only"]]);
    assert_eq!(
        String::from_utf8(member(&exported, MAIN_DOCUMENT)).unwrap(),
        document_xml(&after)
    );
}

#[test]
fn test_round_trip_leaves_no_tokens() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let mut registry = engine.scan(&template).unwrap();
    fill_safe(&engine, &mut registry);
    assert!(registry.is_complete());

    let exported = engine.export(&template, &registry).unwrap();
    assert!(engine.scan(&exported).unwrap().is_empty());

    let text = all_text(&exported);
    for placeholder in registry.iter() {
        let value = placeholder.value.as_deref().unwrap();
        assert!(
            text.matches(value).count() >= placeholder.occurrences,
            "{} appears fewer than {} times",
            value,
            placeholder.occurrences
        );
    }
    assert!(text.contains("of $1,250,000 (the"));
    assert!(text.contains("Dated September 15, 2025"));
    assert!(text.contains("Founder & CEO"));
}

#[test]
fn test_non_text_members_byte_identical() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let mut registry = engine.scan(&template).unwrap();
    fill_safe(&engine, &mut registry);
    let exported = engine.export(&template, &registry).unwrap();

    assert_eq!(member_names(&exported), member_names(&template));
    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/styles.xml",
        "word/media/image1.png",
        "word/endnotes.xml",
    ] {
        assert_eq!(raw_member(&exported, name), raw_member(&template, name), "{} changed", name);
    }
    assert_ne!(member(&exported, "word/header1.xml"), member(&template, "word/header1.xml"));
}

#[test]
fn test_partial_fill_only_touches_filled_keys() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let mut registry = engine.scan(&template).unwrap();
    engine.fill(&mut registry, "company_name", "AlphaSoft Technologies LTD").unwrap();

    let (exported, summary) = engine.export_with_summary(&template, &registry).unwrap();
    assert_eq!(summary.occurrences, 2);
    assert_eq!(summary.parts_changed, vec!["word/document.xml", "word/header1.xml"]);
    assert_eq!(summary.filled, 1);
    assert_eq!(summary.unfilled, 8);

    for name in ["word/footer1.xml", "word/footnotes.xml"] {
        assert_eq!(raw_member(&exported, name), raw_member(&template, name));
    }
    let rescanned = engine.scan(&exported).unwrap();
    assert!(rescanned.get("company_name").is_none());
    assert_eq!(rescanned.len(), 8);
}

#[test]
fn test_export_without_values_returns_template() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let registry = engine.scan(&template).unwrap();
    assert_eq!(engine.export(&template, &registry).unwrap(), template);
}

#[test]
fn test_changed_value_reexports_from_template() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let mut registry = engine.scan(&template).unwrap();

    engine.fill(&mut registry, "state_of_incorporation", "Delaware").unwrap();
    let first = engine.export(&template, &registry).unwrap();
    engine.fill(&mut registry, "state_of_incorporation", "  Nevada ").unwrap();
    let second = engine.export(&template, &registry).unwrap();

    assert!(all_text(&first).contains("a Delaware corporation"));
    assert!(all_text(&second).contains("a Nevada corporation"));
    assert!(!all_text(&second).contains("Delaware"));
}

#[test]
fn test_selector_walks_to_terminal_state() {
    let engine = PlaceholderEngine::default();
    let template = safe_template();
    let mut registry = engine.scan(&template).unwrap();

    let first = engine.next_question(&registry);
    assert_eq!(first, engine.next_question(&registry));
    assert_eq!(first.remaining_count, 9);
    assert_eq!(first.next.as_ref().unwrap().key, "investor_name");

    fill_safe(&engine, &mut registry);
    let done = engine.next_question(&registry);
    assert!(done.next.is_none());
    assert_eq!(done.remaining_count, 0);
    assert!(done.missing_keys.is_empty());
}

#[test]
fn test_missing_main_document_is_malformed() {
    let engine = PlaceholderEngine::default();
    let template = DocxBuilder::new().header(&[&["[Company Name]"]]).build();

    let err = engine.scan(&template).unwrap_err();
    assert!(matches!(err, EngineError::MalformedArchive(_)));
    assert!(err.is_malformed_archive());
}

#[test]
fn test_not_a_package_is_malformed() {
    let engine = PlaceholderEngine::default();
    let err = engine.export(b"PK but not really", &PlaceholderRegistry::new()).unwrap_err();
    assert!(matches!(err, EngineError::MalformedArchive(_)));
}

#[test]
fn test_oversized_part_is_malformed() {
    let engine = PlaceholderEngine::new(EngineConfig {
        max_part_bytes: 64,
        ..EngineConfig::default()
    })
    .unwrap();
    let err = engine.scan(&safe_template()).unwrap_err();
    assert!(matches!(err, EngineError::MalformedArchive(_)));
}

#[test]
fn test_token_after_dangling_dollar_is_filled() {
    let template = DocxBuilder::new()
        .body(&[&["The price is $"], &["[Company Name] agrees."]])
        .build();

    let engine = PlaceholderEngine::default();
    let mut registry = engine.scan(&template).unwrap();
    assert_eq!(registry.len(), 1);
    engine.fill(&mut registry, "company_name", "Acme Inc.").unwrap();

    let exported = engine.export(&template, &registry).unwrap();
    assert_eq!(all_text(&exported), "The price is $Acme Inc. agrees.");
    assert!(engine.scan(&exported).unwrap().is_empty());
}

#[test]
fn test_values_are_not_rescanned_for_tokens() {
    let template = DocxBuilder::new()
        .body(&[&["A: [Company Name]; B: [Investor ", "Name]"]])
        .build();

    let engine = PlaceholderEngine::default();
    let mut registry = engine.scan(&template).unwrap();
    engine.fill(&mut registry, "company_name", "Acme [Investor Name] Ltd").unwrap();
    engine.fill(&mut registry, "investor_name", "Jane").unwrap();

    let (exported, summary) = engine.export_with_summary(&template, &registry).unwrap();
    assert_eq!(summary.occurrences, 2);
    assert_eq!(all_text(&exported), "A: Acme [Investor Name] Ltd; B: Jane");
}
