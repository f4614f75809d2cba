//! Integration tests for the PlaceholderEngine

#[cfg(test)]
mod tests {
    use crate::{EngineConfig, EngineError, PlaceholderEngine};
    use lexfill_advisor::{DeterministicAdvisor, LlmAdvisor, MockProvider};
    use lexfill_domain::traits::TextAdvisor;
    use lexfill_domain::{AdvisorRequest, PlaceholderKind, QuestionRefinement, QuestionSource};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn docx(paragraphs: &[&[&str]]) -> Vec<u8> {
        let mut body = String::new();
        for runs in paragraphs {
            body.push_str("<w:p>");
            for text in *runs {
                body.push_str(&format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", text));
            }
            body.push_str("</w:p>");
        }
        let xml = format!(
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
            body
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn safe() -> Vec<u8> {
        docx(&[
            &["THIS CERTIFIES THAT in exchange for the payment by ", "[Investor Name]", " of $[_____________] (the \"Purchase Amount\")"],
            &["on or about [Date of ", "Safe], [Company Name], a [State of Incorporation] corporation"],
            &["[COMPANY]"],
        ])
    }

    struct FailingAdvisor;

    impl TextAdvisor for FailingAdvisor {
        type Error = String;

        fn refine(&self, _request: &AdvisorRequest) -> Result<QuestionRefinement, Self::Error> {
            Err("advisor offline".to_string())
        }
    }

    #[test]
    fn test_scan_classifies_safe_placeholders() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();

        let summary: Vec<(&str, PlaceholderKind)> =
            registry.iter().map(|p| (p.key.as_str(), p.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("investor_name", PlaceholderKind::Name),
                ("amount", PlaceholderKind::Currency),
                ("date_of_safe", PlaceholderKind::Date),
                ("company_name", PlaceholderKind::Name),
                ("state_of_incorporation", PlaceholderKind::Jurisdiction),
                ("company", PlaceholderKind::Name),
            ]
        );
    }

    #[test]
    fn test_failed_fill_leaves_registry_unchanged() {
        let engine = PlaceholderEngine::default();
        let mut registry = engine.scan(&safe()).unwrap();
        let before = registry.clone();

        let err = engine.fill(&mut registry, "amount", "a lot").unwrap_err();
        assert!(err.is_recoverable());
        let record = err.failure_record("amount").unwrap();
        assert_eq!(record.key, "amount");
        assert!(record.accepted_examples.contains(&"250k".to_string()));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_unknown_key() {
        let engine = PlaceholderEngine::default();
        let mut registry = engine.scan(&safe()).unwrap();

        let err = engine.fill(&mut registry, "missing_key", "x").unwrap_err();
        assert!(matches!(err, EngineError::UnknownKey(ref k) if k == "missing_key"));
        assert!(matches!(
            engine.question_for_key(&registry, "missing_key"),
            Err(EngineError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_fill_reports_normalized_value_and_remaining() {
        let engine = PlaceholderEngine::default();
        let mut registry = engine.scan(&safe()).unwrap();

        let outcome = engine.fill(&mut registry, "amount", "USD 250k").unwrap();
        assert_eq!(outcome.normalized_value, "$250,000");
        assert_eq!(outcome.remaining, registry.len() - 1);
        assert_eq!(registry.get("amount").unwrap().value.as_deref(), Some("$250,000"));
    }

    #[test]
    fn test_currency_question_uses_surrounding_text() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();

        let question = engine.question_for_key(&registry, "amount").unwrap();
        assert_eq!(question.question, "What is the Purchase Amount (in USD)?");
    }

    #[test]
    fn test_advisor_cannot_change_selected_key() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();
        let deterministic = engine.next_question(&registry);

        let advisor = LlmAdvisor::new(MockProvider::new(
            r#"{"key": "company", "question": "Who is investing?", "examples": ["Acme Ventures"]}"#,
        ));
        let refined = engine.ask_with(&registry, &advisor);

        // A response naming another key is discarded
        assert_eq!(refined, deterministic);
    }

    #[test]
    fn test_advisor_refines_wording() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();
        let key = engine.next_question(&registry).next.unwrap().key;

        let response = format!(
            r#"```json
{{"key": "{}", "question": "Which fund or person is investing?", "examples": ["Acme Ventures LP"]}}
```"#,
            key
        );
        let advisor = LlmAdvisor::new(MockProvider::new(response));
        let question = engine.ask_with(&registry, &advisor).next.unwrap();

        assert_eq!(question.key, key);
        assert_eq!(question.question, "Which fund or person is investing?");
        assert_eq!(question.examples, vec!["Acme Ventures LP"]);
        assert_eq!(question.source, QuestionSource::Advisor);
    }

    #[test]
    fn test_advisor_failure_degrades_to_deterministic() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();

        assert_eq!(
            engine.ask_with(&registry, &FailingAdvisor),
            engine.next_question(&registry)
        );
    }

    #[test]
    fn test_deterministic_advisor_keeps_wording() {
        let engine = PlaceholderEngine::default();
        let registry = engine.scan(&safe()).unwrap();

        let plain = engine.next_question(&registry).next.unwrap();
        let advised = engine.ask_with(&registry, &DeterministicAdvisor).next.unwrap();
        assert_eq!(advised.question, plain.question);
        assert_eq!(advised.examples, plain.examples);
    }

    #[test]
    fn test_preview_substitutes_filled_values() {
        let engine = PlaceholderEngine::default();
        let template = safe();
        let mut registry = engine.scan(&template).unwrap();
        engine.fill(&mut registry, "company_name", "AlphaSoft Technologies LTD").unwrap();
        engine.fill(&mut registry, "date_of_safe", "2025-09-15").unwrap();

        let preview = engine.preview(&template, &registry).unwrap();
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "on or about September 15, 2025, AlphaSoft Technologies LTD, a [State of Incorporation] corporation"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            max_part_bytes: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(PlaceholderEngine::new(config), Err(EngineError::Config(_))));
    }
}
