//! Lexer: turns a source string into an ordered [`Symbol`] sequence.
//!
//! `nom` combinators mirror the style of the teacher crate's own
//! `parser/regex.rs`, reduced to a single byte alphabet (no
//! `unicode-segmentation` grapheme handling) and extended with range-order
//! validation, which the teacher's regex grammar has no analogue for (it has
//! no range literal at all).

use nom::branch::alt;
use nom::bytes::complete::take;
use nom::combinator::{map, verify};
use nom::multi::many0;
use nom::IResult;

use crate::error::RegexError;
use crate::symbol::Symbol;

fn one_byte(input: &[u8]) -> IResult<&[u8], u8> {
    map(take(1usize), |b: &[u8]| b[0])(input)
}

/// `x-y`, exactly three bytes with `-` in the middle. Fails outright
/// (`nom::Err::Failure`, not a recoverable `Err::Error`) rather than falling
/// back to three literals when the bounds are reversed, since the three-byte
/// shape unambiguously signals an intended range.
fn range_symbol(input: &[u8]) -> IResult<&[u8], Symbol> {
    let (rest, bytes) = verify(take(3usize), |b: &[u8]| b[1] == b'-')(input)?;
    if bytes[0] > bytes[2] {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((rest, Symbol::Range(bytes[0], bytes[2])))
}

fn operator_symbol(input: &[u8]) -> IResult<&[u8], Symbol> {
    map(
        verify(one_byte, |b: &u8| matches!(b, b'|' | b'*' | b'(' | b')')),
        |b| match b {
            b'|' => Symbol::UnionOp,
            b'*' => Symbol::KleeneStar,
            b'(' => Symbol::OpenParen,
            b')' => Symbol::CloseParen,
            _ => unreachable!("verify restricted b to the four operator bytes"),
        },
    )(input)
}

fn literal_symbol(input: &[u8]) -> IResult<&[u8], Symbol> {
    map(one_byte, Symbol::Literal)(input)
}

pub(crate) fn lex(source: &str) -> Result<Vec<Symbol>, RegexError> {
    let bytes = source.as_bytes();
    match many0(alt((range_symbol, operator_symbol, literal_symbol)))(bytes) {
        Ok((rest, symbols)) if rest.is_empty() => Ok(symbols),
        Ok((rest, _)) => Err(RegexError::InvalidSymbol(bytes.len() - rest.len())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(RegexError::InvalidSymbol(bytes.len() - e.input.len()))
        }
        Err(nom::Err::Incomplete(_)) => Err(RegexError::InvalidSymbol(bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_literals_and_operators() {
        let symbols = lex("a(b|c)*").unwrap();
        assert_eq!(
            symbols,
            vec![
                Symbol::Literal(b'a'),
                Symbol::OpenParen,
                Symbol::Literal(b'b'),
                Symbol::UnionOp,
                Symbol::Literal(b'c'),
                Symbol::CloseParen,
                Symbol::KleeneStar,
            ]
        );
    }

    #[test]
    fn lexes_range() {
        let symbols = lex("a-c").unwrap();
        assert_eq!(symbols, vec![Symbol::Range(b'a', b'c')]);
    }

    #[test]
    fn dash_without_both_neighbours_is_literal() {
        let symbols = lex("a-").unwrap();
        assert_eq!(symbols, vec![Symbol::Literal(b'a'), Symbol::Literal(b'-')]);
    }

    #[test]
    fn reversed_range_is_an_error() {
        assert_eq!(lex("z-a"), Err(RegexError::InvalidSymbol(0)));
    }

    #[test]
    fn empty_source_lexes_to_empty_sequence() {
        assert_eq!(lex("").unwrap(), Vec::new());
    }
}
