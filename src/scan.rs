// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating the input text to a token stream. Whitespace and all
//! three comment styles (`;`, `#;`, `#| |#`) are consumed here and
//! never show up as tokens. The only tokens that denote nesting are
//! `Token::Open` and `Token::Close`; checking that they balance is
//! left to [read](../read/index.html).

use crate::chars::Chars;
use crate::pos::{Pos, Span};
use crate::value::fmt_atom;
use kstring::KString;
use thiserror::Error;
use genawaiter::rc::Gen;
use std::fmt::Write;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected EOF in string starting")]
    UnterminatedString,
    #[error("unexpected EOF in block comment starting")]
    UnterminatedBlockComment,
    #[error("unexpected EOF in expression commented out by '#;'")]
    UnterminatedSexpComment,
    #[error("missing expression after '#;'")]
    MissingSexpCommentDatum,
    #[error("invalid escaped character {0:?}")]
    InvalidEscapedChar(char),
    #[error("invalid decimal escape '\\{0}'")]
    InvalidDecimalEscape(String),
    #[error("not a hex digit: {0:?}")]
    NonHexDigit(char),
    #[error("'|#' outside of block comment")]
    UnexpectedBlockCommentEnd,
    #[error("string is not valid UTF-8 after unescaping")]
    InvalidUtf8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{err} {pos}")]
pub struct ScanErrorWithPos {
    pub err: ScanError,
    pub pos: Pos
}

impl ScanError {
    fn at(self, p: Pos) -> ScanErrorWithPos {
        ScanErrorWithPos {
            err: self,
            pos: p
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(KString),
    Open,
    Close,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Token::Atom(a) => fmt_atom(f, a),
            Token::Open => f.write_char('('),
            Token::Close => f.write_char(')'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWithPos(pub Token, pub Span);

/// Outside of strings and comments, whitespace is only these four.
pub fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C')
}

/// Characters that always end an unquoted atom.
pub fn is_delimiter_char(c: char) -> bool {
    is_whitespace_char(c) || matches!(c, '(' | ')' | '"' | ';')
}

// What `lex` finds; `#;` still needs the following datum dropped.
enum Lexeme {
    Token(Token),
    SexpComment,
}

fn skip_line_comment(cs: &mut Chars) {
    while let Some(c) = cs.peek() {
        if c == '\n' {
            return;
        }
        cs.next();
    }
}

// Expects the cursor right after `#|`, `startpos` being that of the
// `#`.
fn skip_block_comment(
    cs: &mut Chars,
    startpos: Pos,
) -> Result<(), ScanErrorWithPos> {
    let mut depth: u32 = 1;
    let mut scratch = Vec::new();
    loop {
        let pos = cs.pos();
        match cs.peek() {
            None => return Err(ScanError::UnterminatedBlockComment.at(startpos)),
            Some('"') => {
                // Only to find the closing quote; the contents are
                // dropped.
                cs.next();
                read_quoted(cs, pos, &mut scratch)?;
            }
            Some('#') if cs.at_pair('#', '|') => {
                cs.next();
                cs.next();
                depth += 1;
            }
            Some('|') if cs.at_pair('|', '#') => {
                cs.next();
                cs.next();
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(_) => {
                cs.next();
            }
        }
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

// Numeric escapes give bytes, not characters; the string is checked
// to be UTF-8 only once complete.
fn read_escape(
    cs: &mut Chars,
    startpos: Pos,
    out: &mut Vec<u8>,
) -> Result<(), ScanErrorWithPos> {
    let eof = || ScanError::UnterminatedString.at(startpos);
    let (c, pos) = cs.next().ok_or_else(eof)?;
    match c {
        'n' => out.push(b'\n'),
        't' => out.push(b'\t'),
        'r' => out.push(b'\r'),
        'b' => out.push(b'\x08'),
        ' ' => out.push(b' '),
        '\\' => out.push(b'\\'),
        '"' => out.push(b'"'),
        '\n' => {
            // Line continuation, also dropping the indentation of the
            // next line.
            while let Some(' ' | '\t') = cs.peek() {
                cs.next();
            }
        }
        'x' => {
            let mut n = 0;
            for _ in 0..2 {
                let (d, dpos) = cs.next().ok_or_else(eof)?;
                let v = d.to_digit(16)
                    .ok_or_else(|| ScanError::NonHexDigit(d).at(dpos))?;
                n = n * 16 + v;
            }
            // Two hex digits can't exceed 255.
            out.push(n as u8);
        }
        '0'..='9' => {
            let mut digits = String::with_capacity(3);
            digits.push(c);
            for _ in 0..2 {
                match cs.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        digits.push(d);
                        cs.next();
                    }
                    Some(_) => {
                        return Err(ScanError::InvalidDecimalEscape(digits).at(pos))
                    }
                    None => return Err(eof()),
                }
            }
            match digits.parse::<u8>() {
                Ok(n) => out.push(n),
                Err(_) => return Err(ScanError::InvalidDecimalEscape(digits).at(pos)),
            }
        }
        _ => return Err(ScanError::InvalidEscapedChar(c).at(pos))
    }
    Ok(())
}

// Expects the cursor right after the opening `"` at `startpos`.
// Leaves the unescaped bytes in `out`, unchecked.
fn read_quoted(
    cs: &mut Chars,
    startpos: Pos,
    out: &mut Vec<u8>
) -> Result<(), ScanErrorWithPos>
{
    out.clear();
    loop {
        match cs.next() {
            None => return Err(ScanError::UnterminatedString.at(startpos)),
            Some(('"', _)) => return Ok(()),
            Some(('\\', _)) => read_escape(cs, startpos, out)?,
            Some((c, _)) => push_char(out, c),
        }
    }
}

fn read_unquoted(
    cs: &mut Chars,
    out: &mut String
) -> Result<(), ScanErrorWithPos>
{
    out.clear();
    while let Some(c) = cs.peek() {
        if is_delimiter_char(c) || cs.at_pair('#', ';') || cs.at_pair('#', '|') {
            break;
        }
        if cs.at_pair('|', '#') {
            return Err(ScanError::UnexpectedBlockCommentEnd.at(cs.pos()));
        }
        out.push(c);
        cs.next();
    }
    Ok(())
}

// Buffers reused across atoms.
#[derive(Default)]
struct Scratch {
    text: String,
    bytes: Vec<u8>,
}

// Returns the next lexeme and its span, or `None` at EOF.
fn lex(
    cs: &mut Chars,
    tmp: &mut Scratch,
) -> Result<Option<(Lexeme, Span)>, ScanErrorWithPos> {
    loop {
        let pos = cs.pos();
        let c = match cs.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let lexeme = if is_whitespace_char(c) {
            cs.next();
            continue;
        } else if c == ';' {
            skip_line_comment(cs);
            continue;
        } else if cs.at_pair('#', '|') {
            cs.next();
            cs.next();
            skip_block_comment(cs, pos)?;
            continue;
        } else if cs.at_pair('#', ';') {
            cs.next();
            cs.next();
            Lexeme::SexpComment
        } else if c == '(' {
            cs.next();
            Lexeme::Token(Token::Open)
        } else if c == ')' {
            cs.next();
            Lexeme::Token(Token::Close)
        } else if c == '"' {
            cs.next();
            read_quoted(cs, pos, &mut tmp.bytes)?;
            let s = std::str::from_utf8(&tmp.bytes)
                .map_err(|_| ScanError::InvalidUtf8.at(pos))?;
            Lexeme::Token(Token::Atom(KString::from_ref(s)))
        } else {
            read_unquoted(cs, &mut tmp.text)?;
            Lexeme::Token(Token::Atom(KString::from_ref(&tmp.text)))
        };
        return Ok(Some((lexeme, Span::new(pos, cs.pos()))));
    }
}

// Drop the datum following a `#;` at `commentpos`. Comments in
// between are transparent; every further `#;` met on the way owes
// one more datum at its own nesting level.
fn skip_datum(
    cs: &mut Chars,
    tmp: &mut Scratch,
    commentpos: Pos,
) -> Result<(), ScanErrorWithPos> {
    // owed[i]: datums still to drop at nesting level i
    let mut owed: Vec<u32> = vec![1];
    loop {
        let (lexeme, span) = lex(cs, tmp)?.ok_or_else(
            || ScanError::UnterminatedSexpComment.at(commentpos))?;
        let completed = match lexeme {
            Lexeme::SexpComment => {
                if let Some(n) = owed.last_mut() {
                    *n += 1;
                }
                false
            }
            Lexeme::Token(Token::Open) => {
                owed.push(0);
                false
            }
            Lexeme::Token(Token::Close) => {
                if owed.len() == 1 || owed.last() != Some(&0) {
                    return Err(ScanError::MissingSexpCommentDatum.at(span.start));
                }
                owed.pop();
                true
            }
            Lexeme::Token(Token::Atom(_)) => true,
        };
        if completed {
            if let Some(n) = owed.last_mut() {
                if *n > 0 {
                    *n -= 1;
                }
            }
            if owed == [0] {
                return Ok(());
            }
        }
    }
}

/// The lazy token stream for `text`. It ends after the first error.
pub fn scan<'s>(
    text: &'s str,
) -> impl Iterator<Item = Result<TokenWithPos, ScanErrorWithPos>> + 's
{
    Gen::new(|co| async move {
        let mut cs = Chars::new(text);
        let mut tmp = Scratch::default();
        loop {
            match lex(&mut cs, &mut tmp) {
                Err(e) => {
                    co.yield_(Err(e)).await;
                    return;
                }
                Ok(None) => return,
                Ok(Some((Lexeme::Token(t), span))) => {
                    co.yield_(Ok(TokenWithPos(t, span))).await;
                }
                Ok(Some((Lexeme::SexpComment, span))) => {
                    if let Err(e) = skip_datum(&mut cs, &mut tmp, span.start) {
                        co.yield_(Err(e)).await;
                        return;
                    }
                }
            }
        }
    }).into_iter()
}
