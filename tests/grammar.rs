use anyhow::Result;
use locsexpr::read::{read_all, read_one, PlainSink, ReadError};
use locsexpr::scan::{scan, ScanError, Token};
use locsexpr::settings::Settings;
use locsexpr::value::{atom, list, Sexp};
use locsexpr::{parse, parse_located, parse_many, print};
use rstest::rstest;

#[test]
fn nested_block_comments() -> Result<()> {
    assert_eq!(parse_many("#| a #| b |# c |#")?, Vec::<Sexp>::new());
    assert_eq!(parse("#| a |# (b)")?, list([atom("b")]));
    Ok(())
}

#[test]
fn block_comment_strings_hide_terminators() -> Result<()> {
    assert_eq!(parse("#| \"|#\" |# x")?, atom("x"));
    assert_eq!(parse("#| \"\\\"|#\" |# x")?, atom("x"));
    // Comment strings are dropped without being checked for UTF-8.
    assert_eq!(parse("#| \"\\255\" |# x")?, atom("x"));
    Ok(())
}

#[test]
fn sexp_comment_skips_exactly_one_expression() -> Result<()> {
    assert_eq!(parse("(#;(x y) z)")?, list([atom("z")]));
    assert_eq!(parse("(a #;(b (c #;d) e) f)")?, list([atom("a"), atom("f")]));
    assert_eq!(parse("#;a b")?, atom("b"));
    Ok(())
}

#[test]
fn sexp_comments_stack() -> Result<()> {
    assert_eq!(parse_many("#; #; a b c")?, vec![atom("c")]);
    assert_eq!(parse("(#; #; (a) b)")?, list([]));
    Ok(())
}

#[test]
fn comments_between_sexp_comment_and_its_expression() -> Result<()> {
    assert_eq!(parse("(#; ; note\n x y)")?, list([atom("y")]));
    assert_eq!(parse("(#; #| note |# x y)")?, list([atom("y")]));
    Ok(())
}

#[test]
fn empty_list() -> Result<()> {
    assert_eq!(parse("()")?, Sexp::List(vec![]));
    assert_eq!(parse("( \n )")?, list([]));
    Ok(())
}

#[test]
fn line_comment_up_to_eof() -> Result<()> {
    assert_eq!(parse("a ; no newline at the end")?, atom("a"));
    assert_eq!(parse(";first\n;second\n(a;x\nb)")?, list([atom("a"), atom("b")]));
    Ok(())
}

#[test]
fn whitespace_chars() -> Result<()> {
    assert_eq!(parse("(a\x0Cb\tc\nd e)")?,
               list([atom("a"), atom("b"), atom("c"), atom("d"), atom("e")]));
    // Carriage return is not a separator.
    assert_eq!(parse("a\rb")?, atom("a\rb"));
    Ok(())
}

#[test]
fn unquoted_atoms_stop_before_comment_introducers() -> Result<()> {
    assert_eq!(parse_many("a#;b c")?, vec![atom("a"), atom("c")]);
    assert_eq!(parse_many("a#|x|#b")?, vec![atom("a"), atom("b")]);
    assert_eq!(parse_many("a;b\nc")?, vec![atom("a"), atom("c")]);
    Ok(())
}

#[test]
fn unquoted_atoms_are_verbatim() -> Result<()> {
    assert_eq!(parse_many("#foo a#b a|b # | \\n é")?,
               vec![atom("#foo"), atom("a#b"), atom("a|b"), atom("#"),
                    atom("|"), atom("\\n"), atom("é")]);
    Ok(())
}

#[rstest]
#[case(r#""""#, "")]
#[case(r#""a b""#, "a b")]
#[case(r#""\n\t\r\b""#, "\n\t\r\x08")]
#[case(r#""\"\\""#, "\"\\")]
#[case(r#""\ x""#, " x")]
#[case(r#""\065\066""#, "AB")]
#[case(r#""\000""#, "\0")]
#[case(r#""caf\195\169""#, "café")]
#[case(r#""\xc3\xa9t\xc3\xa9""#, "été")]
#[case(r#""\226\x82\xac""#, "€")]
#[case(r#""\x41\x7e""#, "A~")]
#[case("\"abc\\\n    def\"", "abcdef")]
#[case("\"abc\\\n\"", "abc")]
#[case("\"multi\nline\"", "multi\nline")]
#[case(r#""(;#|)""#, "(;#|)")]
fn quoted_atoms(#[case] input: &str, #[case] expected: &str) -> Result<()> {
    assert_eq!(parse(input)?, atom(expected));
    Ok(())
}

#[rstest]
#[case("(a b", ReadError::PrematureEofExpectingClosingParen, 1, 0)]
#[case("((a)", ReadError::PrematureEofExpectingClosingParen, 1, 0)]
#[case("(a\n (b", ReadError::PrematureEofExpectingClosingParen, 2, 1)]
#[case("a b)", ReadError::UnexpectedClosingParen, 1, 3)]
#[case(")", ReadError::UnexpectedClosingParen, 1, 0)]
#[case("\"abc", ReadError::Scan(ScanError::UnterminatedString), 1, 0)]
#[case("\"abc\\", ReadError::Scan(ScanError::UnterminatedString), 1, 0)]
#[case("#| a #| b |#", ReadError::Scan(ScanError::UnterminatedBlockComment), 1, 0)]
#[case("#| \"|# |#", ReadError::Scan(ScanError::UnterminatedString), 1, 3)]
#[case("#;", ReadError::Scan(ScanError::UnterminatedSexpComment), 1, 0)]
#[case("x #; ; comment", ReadError::Scan(ScanError::UnterminatedSexpComment), 1, 2)]
#[case("#; (a", ReadError::Scan(ScanError::UnterminatedSexpComment), 1, 0)]
#[case("(a #;)", ReadError::Scan(ScanError::MissingSexpCommentDatum), 1, 5)]
#[case("#; (a #;)", ReadError::Scan(ScanError::MissingSexpCommentDatum), 1, 8)]
#[case("#; )", ReadError::Scan(ScanError::MissingSexpCommentDatum), 1, 3)]
#[case(r#""\q""#, ReadError::Scan(ScanError::InvalidEscapedChar('q')), 1, 2)]
#[case(r#""\256""#, ReadError::Scan(ScanError::InvalidDecimalEscape("256".into())), 1, 2)]
#[case(r#""\12x""#, ReadError::Scan(ScanError::InvalidDecimalEscape("12".into())), 1, 2)]
#[case(r#""\xg0""#, ReadError::Scan(ScanError::NonHexDigit('g')), 1, 3)]
#[case(r#""\255""#, ReadError::Scan(ScanError::InvalidUtf8), 1, 0)]
#[case(r#"(a "x\xc3")"#, ReadError::Scan(ScanError::InvalidUtf8), 1, 3)]
#[case(r#"#;"\200" x"#, ReadError::Scan(ScanError::InvalidUtf8), 1, 2)]
#[case("a|#", ReadError::Scan(ScanError::UnexpectedBlockCommentEnd), 1, 1)]
#[case("(|#)", ReadError::Scan(ScanError::UnexpectedBlockCommentEnd), 1, 1)]
#[case("", ReadError::NoExpression, 1, 0)]
#[case("; only\n#| comments |#\n", ReadError::NoExpression, 3, 0)]
#[case("a b", ReadError::TrailingExpression, 1, 2)]
#[case("(a)\n(b)", ReadError::TrailingExpression, 2, 0)]
fn parse_errors(
    #[case] input: &str,
    #[case] expected: ReadError,
    #[case] line: u32,
    #[case] col: u32,
) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.kind(), &expected);
    assert_eq!((err.pos().line, err.pos().col), (line, col));
    // The located path rejects the same inputs the same way.
    assert_eq!(parse_located(input).unwrap_err(), err);
}

#[test]
fn parse_error_display() {
    let err = parse("(a\n  (b c)").unwrap_err();
    assert_eq!(err.to_string(),
               "premature EOF while expecting closing character ')' for '(' @1.0");
    let err = parse("(x \"\\q\")").unwrap_err();
    assert_eq!(err.to_string(), "invalid escaped character 'q' @1.5");
    assert_eq!(err.pos().offset, 5);
}

#[test]
fn stray_close_after_complete_value_is_unbalanced() {
    let err = parse("(a) b)").unwrap_err();
    assert_eq!(err.kind(), &ReadError::UnexpectedClosingParen);
}

#[test]
fn nesting_depth_is_bounded() -> Result<()> {
    let ok = format!("{}{}", "(".repeat(500), ")".repeat(500));
    parse(&ok)?;
    let deep = format!("{}{}", "(".repeat(600), ")".repeat(600));
    let err = parse(&deep).unwrap_err();
    assert_eq!(err.kind(), &ReadError::NestingTooDeep);
    assert_eq!(err.pos().col, 500);
    Ok(())
}

#[test]
fn nesting_depth_is_configurable() -> Result<()> {
    let settings = Settings { max_depth: 2 };
    read_all("(a (b)) c", &mut PlainSink, &settings)?;
    let err = read_one("(a (b (c)))", &mut PlainSink, &settings).unwrap_err();
    assert_eq!(err.kind(), &ReadError::NestingTooDeep);
    assert_eq!(err.pos().col, 6);
    Ok(())
}

#[test]
fn deep_trees_read_back_with_a_larger_limit() -> Result<()> {
    let mut v = atom("x");
    for _ in 0..2000 {
        v = list([v]);
    }
    let printed = print(&v);
    let err = parse(&printed).unwrap_err();
    assert_eq!(err.kind(), &ReadError::NestingTooDeep);
    assert_eq!(err.pos().col, 500);
    let settings = Settings { max_depth: 2000 };
    assert_eq!(read_one(&printed, &mut PlainSink, &settings)?, v);
    let err = read_one(&printed, &mut PlainSink, &Settings { max_depth: 1999 })
        .unwrap_err();
    assert_eq!(err.pos().col, 1999);
    Ok(())
}

#[test]
fn deep_sexp_comments_need_no_depth() -> Result<()> {
    let deep = format!("#;{}{} x", "(".repeat(2000), ")".repeat(2000));
    assert_eq!(parse(&deep)?, atom("x"));
    Ok(())
}

#[test]
fn scanner_emits_only_structure_and_atoms() -> Result<()> {
    let tokens = scan("(a #;b ; c\n \"d e\" #| f |#)")
        .map(|r| r.map(|t| t.0))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(tokens,
               vec![Token::Open,
                    Token::Atom("a".into()),
                    Token::Atom("d e".into()),
                    Token::Close]);
    let printed: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    assert_eq!(printed, ["(", "a", "\"d e\"", ")"]);
    Ok(())
}

#[test]
fn scanner_leaves_balance_to_the_reader() {
    let tokens: Vec<_> = scan(") (").collect();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|r| r.is_ok()));
}

#[test]
fn scanner_stops_after_error() {
    let results: Vec<_> = scan("a \"b").collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err().err, ScanError::UnterminatedString);
}
