use super::*;

#[test]
fn test_line_col() {
    let source = SourceFile::new("test.logo", "line1\nline2\nline3");

    assert_eq!(source.line_col(0), (1, 1)); // Start of line 1
    assert_eq!(source.line_col(5), (1, 6)); // End of line 1
    assert_eq!(source.line_col(6), (2, 1)); // Start of line 2
    assert_eq!(source.line_col(12), (3, 1)); // Start of line 3
}

#[test]
fn test_get_line() {
    let source = SourceFile::new("test.logo", "FD 10\nRT 90\nPU");

    assert_eq!(source.get_line(1), Some("FD 10"));
    assert_eq!(source.get_line(2), Some("RT 90"));
    assert_eq!(source.get_line(3), Some("PU"));
    assert_eq!(source.get_line(4), None);
    assert_eq!(source.get_line(0), None);
}

#[test]
fn test_name() {
    let source = SourceFile::new("<repl>", "");
    assert_eq!(source.name(), "<repl>");
    assert_eq!(source.line_col(0), (1, 1));
}
