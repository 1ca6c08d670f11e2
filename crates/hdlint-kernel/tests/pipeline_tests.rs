//! End-to-end tests for scan → dispatch → map.
//!
//! The Python validator is disabled everywhere here so the tests don't
//! depend on an interpreter being installed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hdlint_kernel::hdlint_types::{
    Diagnostic, DiagnosticCode, LocalDiagnostic, Position, Range, Region, Severity,
};
use hdlint_kernel::validators::{JsonValidator, YamlValidator};
use hdlint_kernel::{
    Document, Engine, TagRegistry, ValidationConfig, Validator, ValidatorError, ValidatorRegistry,
};

fn config() -> ValidationConfig {
    let mut config = ValidationConfig::default();
    config.set_enabled("python", false);
    config
}

fn engine() -> Engine {
    Engine::with_defaults(config())
}

fn doc(text: &str) -> Document {
    Document::from_text("test.sh", 1, text)
}

async fn validate(engine: &Engine, text: &str) -> Vec<Diagnostic> {
    engine.validate(&doc(text)).await.expect("scan should succeed")
}

/// Reports one error on a fixed body line, and counts calls.
struct Fixed {
    key: &'static str,
    line: u32,
    calls: AtomicUsize,
}

impl Fixed {
    fn new(key: &'static str, line: u32) -> Self {
        Self {
            key,
            line,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Validator for Fixed {
    fn key(&self) -> &str {
        self.key
    }

    async fn validate(&self, _text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![LocalDiagnostic::error(
            "fixed",
            Range::single_char(self.line, 0),
        )])
    }
}

struct Failing;

#[async_trait]
impl Validator for Failing {
    fn key(&self) -> &str {
        "broken"
    }

    async fn validate(&self, _text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        Err(ValidatorError::Failed("checker crashed".into()))
    }
}

struct Panicking;

#[async_trait]
impl Validator for Panicking {
    fn key(&self) -> &str {
        "broken"
    }

    async fn validate(&self, _text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        panic!("boom");
    }
}

/// Tags BROKEN → broken and JSON → json, with the given broken validator.
fn engine_with_broken(broken: impl Validator + 'static) -> Engine {
    let mut tags = TagRegistry::new();
    tags.insert("BROKEN", "broken");
    tags.insert("JSON", "json");

    let mut validators = ValidatorRegistry::new();
    validators.register(broken);
    validators.register(JsonValidator);

    Engine::new(tags, validators, ValidationConfig::default())
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn trailing_comma_reports_on_body_line() {
    let diags = validate(&engine(), "cat <<JSON\n{\"a\": 1,}\nJSON\n").await;

    assert_eq!(diags.len(), 1, "got {diags:?}");
    let d = &diags[0];
    assert_eq!(d.severity, Severity::Error);
    assert_eq!(d.range.start.line, 1);
    assert_eq!(d.source, "heredoc:json");
    assert_eq!(d.code, DiagnosticCode::Syntax);
}

#[tokio::test]
async fn unterminated_heredoc_produces_nothing() {
    let engine = engine();
    let buffer = doc("cat <<YAML\na: [1, 2\n");

    assert!(engine.scan(&buffer).unwrap().is_empty());
    assert!(engine.validate(&buffer).await.unwrap().is_empty());
}

#[tokio::test]
async fn back_to_back_valid_regions() {
    let text = "cat <<JSON\n{\"a\": 1}\nJSON\ncat <<XML\n<a><b/></a>\nXML\n";
    let engine = engine();

    let regions = engine.scan(&doc(text)).unwrap();
    assert_eq!(
        regions,
        vec![Region::new("JSON", 1, 2), Region::new("XML", 4, 5)]
    );
    assert!(validate(&engine, text).await.is_empty());
}

#[tokio::test]
async fn errors_in_second_region_are_offset() {
    let text = "\
#!/bin/sh
cat <<JSON
{}
JSON
echo between
cat <<'YAML'
a: 1
b: [1, 2
YAML
";
    let diags = validate(&engine(), text).await;

    assert_eq!(diags.len(), 1, "got {diags:?}");
    assert_eq!(diags[0].source, "heredoc:yaml");
    // Body starts at line 6; the error is on or after the unclosed flow list.
    assert!(diags[0].range.start.line >= 7, "got {:?}", diags[0].range);
    assert!(diags[0].range.start.line <= 8, "got {:?}", diags[0].range);
}

#[tokio::test]
async fn plist_routes_to_xml() {
    let diags = validate(&engine(), "cat <<PLIST\n<dict>\n</array>\nPLIST\n").await;

    assert_eq!(diags.len(), 1, "got {diags:?}");
    assert_eq!(diags[0].source, "heredoc:xml");
    assert_eq!(diags[0].severity, Severity::Error);
}

#[tokio::test]
async fn unknown_tags_are_ignored() {
    let text = "cat <<EOF\n{not json\nEOF\ncat <<JSONX\n{\nJSONX\n";
    let engine = engine();

    assert!(engine.scan(&doc(text)).unwrap().is_empty());
    assert!(validate(&engine, text).await.is_empty());
}

// ============================================================================
// Size guard
// ============================================================================

#[tokio::test]
async fn oversized_body_is_skipped_not_validated() {
    let mut config = config();
    config.max_bytes = 16;
    let engine = Engine::with_defaults(config);

    // Invalid JSON, but too big to look at.
    let diags = validate(&engine, "cat <<JSON\n{\"aaaaaaaaaaaaaaaaaaaa\": \nJSON\n").await;

    assert_eq!(
        diags,
        vec![Diagnostic::skipped_too_large("json", 1)]
    );
    assert_eq!(diags[0].severity, Severity::Information);
    assert_eq!(diags[0].range.start, Position::new(1, 0));
}

#[tokio::test]
async fn body_at_limit_is_validated() {
    let mut config = config();
    // `{"a": 1,}` is exactly nine bytes.
    config.max_bytes = 9;
    let engine = Engine::with_defaults(config);

    let diags = validate(&engine, "cat <<JSON\n{\"a\": 1,}\nJSON\n").await;

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, DiagnosticCode::Syntax);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn validator_error_becomes_diagnostic() {
    let engine = engine_with_broken(Failing);
    let text = "cat <<BROKEN\nanything\nBROKEN\ncat <<JSON\n{}\nJSON\n";

    let diags = validate(&engine, text).await;

    assert_eq!(diags.len(), 1, "valid JSON adds nothing: {diags:?}");
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].code, DiagnosticCode::ValidatorFailed);
    assert_eq!(diags[0].range.start.line, 1);
    assert!(diags[0].message.contains("checker crashed"));
}

#[tokio::test]
async fn validator_panic_is_contained() {
    let engine = engine_with_broken(Panicking);
    let text = "cat <<JSON\n[1,]\nJSON\ncat <<BROKEN\nx\nBROKEN\n";

    let diags = validate(&engine, text).await;

    assert_eq!(diags.len(), 2, "got {diags:?}");
    assert_eq!(diags[0].source, "heredoc:json");
    assert_eq!(diags[0].code, DiagnosticCode::Syntax);
    assert_eq!(diags[1].source, "heredoc:broken");
    assert_eq!(diags[1].code, DiagnosticCode::ValidatorFailed);
    assert_eq!(diags[1].range.start.line, 4);
    assert!(diags[1].message.contains("boom"), "got {}", diags[1].message);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn disabled_key_is_never_invoked() {
    let fixed = Arc::new(Fixed::new("json", 0));
    let mut validators = ValidatorRegistry::new();
    validators.register_arc(fixed.clone());
    let mut config = ValidationConfig::default();
    config.set_enabled("json", false);
    let engine = Engine::new(TagRegistry::with_defaults(), validators, config);

    let diags = validate(&engine, "cat <<JSON\n{\nJSON\n").await;

    assert!(diags.is_empty());
    assert_eq!(fixed.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unregistered_key_is_skipped() {
    let mut validators = ValidatorRegistry::new();
    validators.register(YamlValidator);
    let engine = Engine::new(
        TagRegistry::with_defaults(),
        validators,
        ValidationConfig::default(),
    );

    let diags = validate(&engine, "cat <<JSON\n{\nJSON\ncat <<YML\n[\nYML\n").await;

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].source, "heredoc:yaml");
}

#[tokio::test]
async fn local_lines_map_onto_buffer_lines() {
    // The validator reports body line 2; the body starts at buffer line 3.
    let mut validators = ValidatorRegistry::new();
    validators.register(Fixed::new("json", 2));
    let engine = Engine::new(
        TagRegistry::with_defaults(),
        validators,
        ValidationConfig::default(),
    );

    let diags = validate(&engine, "a\nb\ncat <<JSON\nl0\nl1\nl2\nJSON\n").await;

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].range.start, Position::new(5, 0));
    assert_eq!(diags[0].message, "fixed");
}

#[tokio::test]
async fn diagnostics_follow_region_order() {
    let text = "cat <<XML\n<a>\n</b>\nXML\ncat <<JSON\n{,}\nJSON\n";
    let diags = validate(&engine(), text).await;

    let sources: Vec<_> = diags.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources.first(), Some(&"heredoc:xml"), "got {diags:?}");
    assert_eq!(sources.last(), Some(&"heredoc:json"), "got {diags:?}");
    assert!(diags.iter().all(|d| d.is_error()));
}
