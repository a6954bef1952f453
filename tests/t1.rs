use anyhow::Result;
use locsexpr::read::{read_all, PlainSink};
use locsexpr::settings::DEFAULT_SETTINGS;
use locsexpr::value::print_many;

const INPUT: &str = include_str!("t-input.sexp");
const EXPECTED: &str = include_str!("t-expected.sexp");

#[test]
fn t1() -> Result<()> {
    let vals = read_all(INPUT, &mut PlainSink, &DEFAULT_SETTINGS)?;
    let out = print_many(&vals);
    assert_eq!(out, EXPECTED);
    Ok(())
}

#[test]
fn t1_printed_output_is_a_fixpoint() -> Result<()> {
    let vals = read_all(EXPECTED, &mut PlainSink, &DEFAULT_SETTINGS)?;
    assert_eq!(print_many(&vals), EXPECTED);
    Ok(())
}
