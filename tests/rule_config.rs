use std::io::Write;

use repaint::defaults::{self, builtin_config};
use repaint::migrate::Engine;
use tempfile::NamedTempFile;

fn rules_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn custom_family_rewrites_with_its_own_namespaces() {
    let file = rules_file(
        r#"{
            "rules": {
                "legacy_namespace": "OldFonts",
                "new_namespace": "Typography",
                "level_namespace": "Weight",
                "direct": [
                    { "name": "title", "symbol": "title", "replacement": "headline" }
                ],
                "opacity": { "0.5": "regular" },
                "parameterized": ["title"],
                "skip": [{ "pattern": "OldFonts.Legal." }]
            }
        }"#,
    );

    let config = defaults::load_config(Some(file.path())).unwrap();
    let engine = Engine::from_config(&config.rules).unwrap();
    assert_eq!(engine.rules.legacy_namespace(), "OldFonts");
    assert_eq!(engine.rules.new_namespace(), "Typography");
    assert_eq!(engine.rules.marker(), "OldFonts.");
    let rewriter = engine.rewriter();

    let outcome = rewriter.rewrite("a(OldFonts.title) b(OldFonts.title.opacity(0.5))", 1);
    assert_eq!(
        outcome.line,
        "a(Typography.headline) b(Typography.headline.opacity(Weight.regular))"
    );
    assert_eq!(outcome.replacements, 2);

    let protected = rewriter.rewrite("OldFonts.Legal.footer", 2);
    assert_eq!(
        protected.skipped.unwrap().reason,
        "Contains OldFonts.Legal. (domain-specific color)"
    );
}

#[test]
fn partial_file_falls_back_to_builtin_sections() {
    let file = rules_file(r#"{ "discovery": { "extensions": ["swift", "m"] } }"#);

    let config = defaults::load_config(Some(file.path())).unwrap();

    assert_eq!(config.discovery.extensions, vec!["swift", "m"]);
    assert_eq!(config.rules, builtin_config().rules);
}

#[test]
fn missing_rules_file_is_not_found() {
    let err = defaults::load_config(Some(std::path::Path::new("/nonexistent/rules.json")))
        .unwrap_err();
    assert_eq!(err.code.as_str(), "target.not_found");
}

#[test]
fn malformed_rules_file_is_invalid_json() {
    let file = rules_file("{ \"rules\": [ }");
    let err = defaults::load_config(Some(file.path())).unwrap_err();
    assert_eq!(err.code.as_str(), "config.invalid_json");
}

#[test]
fn parameterized_symbol_without_direct_rule_is_rejected() {
    let mut config = builtin_config();
    config.rules.parameterized.push("brandGold".to_string());

    let err = Engine::from_config(&config.rules).unwrap_err();
    assert_eq!(err.code.as_str(), "config.invalid_value");
}

#[test]
fn new_namespace_containing_marker_is_rejected() {
    let mut config = builtin_config();
    config.rules.new_namespace = "AppColors".to_string();

    assert!(Engine::from_config(&config.rules).is_err());
}
