//! 替换表达式解析集成测试
//!
//! 对应源文件: src/replace_expr.rs
//! 测试范围: 范围、标志、转义、错误

use findrep_core::error::ExpressionParseError;
use findrep_core::replace_expr::{parse_replace_expr, LineRange, ReplaceFlags};

// ==================== 范围 ====================

#[test]
fn test_span_with_global_and_ignore_case() {
    let spec = parse_replace_expr("5,10s/foo/bar/gi").unwrap();
    assert_eq!(spec.range, LineRange::Span { start: 5, end: 10 });
    assert_eq!(spec.find.as_deref(), Some("foo"));
    assert_eq!(spec.replacement, "bar");
    assert_eq!(
        spec.flags,
        ReplaceFlags {
            global: true,
            confirm: false,
            ignore_case: true,
        }
    );
}

#[test]
fn test_whole_buffer_without_flags() {
    let spec = parse_replace_expr("%s/foo/bar/").unwrap();
    assert_eq!(spec.range, LineRange::Whole);
    assert_eq!(spec.flags, ReplaceFlags::default());
}

#[test]
fn test_single_line_and_current_line() {
    assert_eq!(parse_replace_expr("7s/a/b/").unwrap().range, LineRange::Line(7));
    assert_eq!(parse_replace_expr(":s/a/b/").unwrap().range, LineRange::Current);
}

#[test]
fn test_whole_buffer_with_end_is_rejected() {
    let err = parse_replace_expr("%,10s/foo/bar/").unwrap_err();
    assert_eq!(err, ExpressionParseError::WholeBufferWithEnd);
    assert_eq!(err.to_string(), "cannot provide both whole-buffer and ending line");
}

#[test]
fn test_dangling_comma() {
    assert_eq!(
        parse_replace_expr("5,s/a/b/").unwrap_err(),
        ExpressionParseError::MissingEnd(5)
    );
    assert_eq!(
        parse_replace_expr(",10s/a/b/").unwrap_err(),
        ExpressionParseError::MissingStart(10)
    );
}

#[test]
fn test_bad_line_numbers() {
    assert!(matches!(
        parse_replace_expr("0s/a/b/"),
        Err(ExpressionParseError::InvalidLine(_))
    ));
    assert!(matches!(
        parse_replace_expr("x,3s/a/b/"),
        Err(ExpressionParseError::InvalidLine(_))
    ));
    assert_eq!(
        parse_replace_expr("9,3s/a/b/").unwrap_err(),
        ExpressionParseError::BackwardsRange { start: 9, end: 3 }
    );
}

// ==================== 字段与标志 ====================

#[test]
fn test_empty_find_reuses_pattern() {
    let spec = parse_replace_expr("s//bar/").unwrap();
    assert_eq!(spec.find, None);
    assert_eq!(spec.replacement, "bar");
}

#[test]
fn test_empty_replacement_deletes() {
    let spec = parse_replace_expr("%s/x//g").unwrap();
    assert_eq!(spec.replacement, "");
    assert!(spec.flags.global);
}

#[test]
fn test_confirm_flag() {
    let spec = parse_replace_expr("s/a/b/gc").unwrap();
    assert!(spec.flags.confirm);
    assert!(spec.flags.global);
}

#[test]
fn test_unknown_flag() {
    assert_eq!(
        parse_replace_expr("s/a/b/gx").unwrap_err(),
        ExpressionParseError::UnknownFlag('x')
    );
}

#[test]
fn test_malformed_shapes() {
    assert_eq!(parse_replace_expr("").unwrap_err(), ExpressionParseError::Empty);
    assert!(matches!(
        parse_replace_expr("s/only"),
        Err(ExpressionParseError::Malformed(_))
    ));
    assert!(matches!(
        parse_replace_expr("s/a/b/g/extra"),
        Err(ExpressionParseError::Malformed(_))
    ));
    assert!(matches!(
        parse_replace_expr("foo"),
        Err(ExpressionParseError::Malformed(_))
    ));
}

#[test]
fn test_escaped_delimiter() {
    let spec = parse_replace_expr(r"%s/\/usr\/bin/\/opt/g").unwrap();
    assert_eq!(spec.find.as_deref(), Some("/usr/bin"));
    assert_eq!(spec.replacement, "/opt");
}
