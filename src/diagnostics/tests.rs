use super::*;
use miette::Diagnostic;

fn source(text: &str) -> SourceFile {
    SourceFile::new("test.logo", text)
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(&Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
    assert_eq!(merged.len(), 20);
}

#[test]
fn test_or_at_keeps_existing_span() {
    let err = LogoError::division_by_zero()
        .at(Span::new(3, 4))
        .or_at(Span::new(0, 10));
    assert_eq!(err.span, Some(Span::new(3, 4)));

    let err = LogoError::division_by_zero().or_at(Span::new(0, 10));
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(LogoError::parse("]", "end of input", Span::new(0, 0)).code(), "E0001");
    assert_eq!(LogoError::unknown_command("JUMP").code(), "E4001");
    assert_eq!(LogoError::division_by_zero().code(), "E4004");
    assert_eq!(LogoError::for_loop_step().code(), "E4010");
}

#[test]
fn test_messages() {
    insta::assert_snapshot!(
        LogoError::arity_mismatch("SQUARE", 1, 2).to_string(),
        @"SQUARE expects 1 inputs, got 2"
    );
    insta::assert_snapshot!(
        LogoError::index_out_of_bounds(4.0, 3).to_string(),
        @"index 4 is out of bounds for a list of length 3"
    );
    insta::assert_snapshot!(
        LogoError::undefined_variable("size").to_string(),
        @":size has no value"
    );
}

#[test]
fn test_report_resolves_line_and_column() {
    let src = source("FD 10\nRT 90\nJUMP 5");
    let err = LogoError::unknown_command("JUMP").at(Span::new(12, 16));
    let report = err.report(&src);
    assert_eq!(report.line, Some(3));
    assert_eq!(report.column, Some(1));
    assert!(report.to_json().contains("\"code\":\"E4001\""));
    assert!(report
        .to_human_readable()
        .contains("error[E4001]: I don't know how to JUMP"));
}

#[test]
fn test_report_without_span() {
    let report = LogoError::division_by_zero().report(&source("PRINT 1 / 0"));
    assert_eq!(report.line, None);
    assert!(!report.to_json().contains("line"));
}

#[test]
fn test_miette_labels() {
    let err = LogoError::parse("]", "end of input", Span::new(4, 5));
    let labels: Vec<_> = err.labels().expect("labels").collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 4);
    assert_eq!(labels[0].len(), 1);
    assert_eq!(
        Diagnostic::code(&err).map(|c| c.to_string()),
        Some("E0001".to_string())
    );
}
