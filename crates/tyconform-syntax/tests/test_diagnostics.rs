//! Rendering of syntax errors through the emitter.

use tyconform_syntax::{parse_declarations, parse_fixture, Diagnostic, Emitter, SourceFile, SourceKind};

fn render_first_error(source: &str, kind: SourceKind) -> String {
    let errors = match kind {
        SourceKind::Declarations => parse_declarations(source).map(|_| ()).unwrap_err(),
        SourceKind::Fixture => parse_fixture(source).map(|_| ()).unwrap_err(),
    };
    let file = SourceFile::new("input.ts", source, kind);

    let mut out = Vec::new();
    Emitter::new(false)
        .emit_syntax_error(&mut out, &errors[0], &file)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_error_points_at_offending_token() {
    let output = render_first_error("interface Worker {\n  send(: string): void;\n}", SourceKind::Declarations);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "input.ts:2:8: error: expected parameter name, found ':'");
    assert_eq!(lines[2], "   2 |   send(: string): void;");
    assert_eq!(lines[3], "     |        ^");
}

#[test]
fn test_unknown_directive() {
    let output = render_first_error("// $ExpectTyp Worker\nf();", SourceKind::Fixture);
    assert!(output.contains("unknown directive '$ExpectTyp'"), "{output}");
    assert!(output.contains("[TC0001 LexerError]"));
}

#[test]
fn test_diagnostic_conversion_keeps_code() {
    let errors = parse_fixture("f(;").unwrap_err();
    let diagnostic = Diagnostic::from(&errors[0]);
    assert_eq!(diagnostic.code.as_deref(), Some("TC0002"));
    assert!(diagnostic.is_error());
}

#[test]
fn test_caret_after_non_ascii_text() {
    let output = render_first_error("const s = \"é\"; f(;", SourceKind::Fixture);
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].starts_with("input.ts:1:18: error:"), "{output}");
    assert_eq!(lines[3], format!("     | {}^", " ".repeat(17)));
}
