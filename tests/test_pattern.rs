use inputmask_core::{MaskError, Pattern, default_format_characters};

fn compile(src: &str) -> Result<Pattern, MaskError> {
    Pattern::compile(src, &default_format_characters(), '_', false)
}

fn compile_revealing(src: &str) -> Result<Pattern, MaskError> {
    Pattern::compile(src, &default_format_characters(), '_', true)
}

fn fmt(p: &Pattern, value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    p.format_value(&chars).iter().collect()
}

#[test]
fn test_compile() {
    let p = compile("00/00").unwrap();
    assert_eq!(p.len(), 5);
    assert_eq!(p.source(), "00/00");
    assert_eq!(p.first_editable_index(), 0);
    assert_eq!(p.last_editable_index(), 4);

    assert!(p.is_editable_index(0));
    assert!(p.is_editable_index(1));
    assert!(!p.is_editable_index(2));
    assert!(p.is_editable_index(3));
    assert!(p.is_editable_index(4));
    assert!(!p.is_editable_index(5));

    assert_eq!(p.char_at(2), Some('/'));
    assert_eq!(p.char_at(0), Some('0'));
    assert_eq!(p.char_at(5), None);
}

#[test]
fn test_compile_escape() {
    // escaped format character becomes a literal
    let p = compile("\\00").unwrap();
    assert_eq!(p.len(), 2);
    assert!(!p.is_editable_index(0));
    assert!(p.is_editable_index(1));
    assert_eq!(p.first_editable_index(), 1);
    assert_eq!(p.char_at(0), Some('0'));

    let p = compile("0\\0").unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.last_editable_index(), 0);

    // escaped escape character
    let p = compile("\\\\0").unwrap();
    assert_eq!(p.char_at(0), Some('\\'));
    assert!(p.is_editable_index(1));
}

#[test]
fn test_compile_errors() {
    assert_eq!(
        compile(""),
        Err(MaskError::NoEditablePosition("".into()))
    );
    assert_eq!(
        compile("--"),
        Err(MaskError::NoEditablePosition("--".into()))
    );
    assert_eq!(compile("\\"), Err(MaskError::DanglingEscape("\\".into())));
    assert_eq!(
        compile("00\\"),
        Err(MaskError::DanglingEscape("00\\".into()))
    );
}

#[test]
fn test_format_value() {
    let p = compile("00/00").unwrap();

    assert_eq!(fmt(&p, ""), "__/__");
    assert_eq!(fmt(&p, "1"), "1_/__");
    assert_eq!(fmt(&p, "123"), "12/3_");
    assert_eq!(fmt(&p, "1234"), "12/34");
    // literals embedded in the raw value are absorbed
    assert_eq!(fmt(&p, "12/34"), "12/34");
    // excess candidates are dropped
    assert_eq!(fmt(&p, "123456"), "12/34");
}

#[test]
fn test_format_value_truncating() {
    // a non-revealing mask stops filling at the first bad candidate
    let p = compile("000").unwrap();
    assert_eq!(fmt(&p, "1x3"), "1__");

    // a revealing mask skips it and keeps filling
    let p = compile_revealing("000").unwrap();
    assert_eq!(fmt(&p, "1x3"), "1_3");
    assert_eq!(fmt(&p, "1"), "1__");
}

#[test]
fn test_format_value_transform() {
    let p = compile("AA").unwrap();
    assert_eq!(fmt(&p, "ab"), "AB");
}

#[test]
fn test_validity() {
    let p = compile("00/00").unwrap();
    assert!(p.is_valid_at('5', 0));
    assert!(!p.is_valid_at('a', 0));
    // literal positions accept nothing
    assert!(!p.is_valid_at('/', 2));
    assert!(!p.is_valid_at('5', 17));

    assert_eq!(p.transform_at('5', 0), '5');
    let p = compile("A").unwrap();
    assert_eq!(p.transform_at('x', 0), 'X');
}

#[test]
fn test_find_editable_index_before() {
    let p = compile("00/00").unwrap();
    assert_eq!(p.find_editable_index_before(5), 4);
    assert_eq!(p.find_editable_index_before(4), 3);
    // skips the literal
    assert_eq!(p.find_editable_index_before(3), 1);
    assert_eq!(p.find_editable_index_before(1), 0);
    // boundary fallback
    assert_eq!(p.find_editable_index_before(0), 0);

    let p = compile("--0").unwrap();
    assert_eq!(p.find_editable_index_before(2), 0);
}
