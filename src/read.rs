// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building trees from the token stream of [scan](../scan/index.html).

//! There is only one reader; what it builds is decided by a
//! [TreeSink](TreeSink). [PlainSink](PlainSink) drops the spans the
//! scanner hands out and builds [Sexp](Sexp), [LocatedSink](LocatedSink)
//! keeps them and builds [LocatedSexp](LocatedSexp). Both thus accept
//! and reject exactly the same inputs. Positions in errors are exact
//! either way.

use crate::pos::{Pos, Span};
use crate::context::Context;
use crate::scan::{Token, TokenWithPos, scan, ScanError, ScanErrorWithPos};
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::value::{Sexp, LocatedSexp};
use kstring::KString;
use std::fmt::{Formatter, Display};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("{0}")]
    Scan(ScanError),
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("unexpected closing character ')'")]
    UnexpectedClosingParen,
    #[error("premature EOF while expecting closing character ')' for '('")]
    PrematureEofExpectingClosingParen,
    #[error("expecting an expression, got EOF")]
    NoExpression,
    #[error("expecting a single expression, got another one")]
    TrailingExpression,
}

/// Why and where reading failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{err} {pos}")]
pub struct ParseError {
    err: ReadError,
    pos: Pos
}

impl ParseError {
    pub fn kind(&self) -> &ReadError {
        &self.err
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Attach the name of the source of the text.
    pub fn with_context(self, container: Box<dyn Context>) -> ParseErrorWithContext {
        ParseErrorWithContext {
            err: self,
            container
        }
    }
}

impl ReadError {
    fn at(self, p: Pos) -> ParseError {
        ParseError {
            err: self,
            pos: p
        }
    }
}

impl From<ScanErrorWithPos> for ParseError {
    fn from(ep: ScanErrorWithPos) -> ParseError {
        let ScanErrorWithPos { err, pos } = ep;
        ParseError {
            err: ReadError::Scan(err),
            pos
        }
    }
}

#[derive(Error, Debug)]
pub struct ParseErrorWithContext {
    err: ParseError,
    container: Box<dyn Context>
}

impl ParseErrorWithContext {
    pub fn parse_error(&self) -> &ParseError {
        &self.err
    }

    pub fn source_name(&self) -> String {
        self.container.to_string_without_pos()
    }
}

impl Display for ParseErrorWithContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ",
                                 self.err.err))?;
        self.container.format_with_pos(Some(self.err.pos), f)?;
        Ok(())
    }
}


/// What the reader builds from atoms and finished lists.
pub trait TreeSink {
    type Node;
    fn atom(&mut self, atom: KString, span: Span) -> Self::Node;
    fn list(&mut self, items: Vec<Self::Node>, span: Span) -> Self::Node;
}

/// Builds [Sexp](Sexp), ignoring spans.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainSink;

impl TreeSink for PlainSink {
    type Node = Sexp;

    #[inline]
    fn atom(&mut self, atom: KString, _span: Span) -> Sexp {
        Sexp::Atom(atom)
    }

    #[inline]
    fn list(&mut self, items: Vec<Sexp>, _span: Span) -> Sexp {
        Sexp::List(items)
    }
}

/// Builds [LocatedSexp](LocatedSexp).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocatedSink;

impl TreeSink for LocatedSink {
    type Node = LocatedSexp;

    fn atom(&mut self, atom: KString, span: Span) -> LocatedSexp {
        LocatedSexp::Atom(atom, span)
    }

    fn list(&mut self, items: Vec<LocatedSexp>, span: Span) -> LocatedSexp {
        LocatedSexp::List(items, span)
    }
}


// Read the rest of the list opened at `open`, up to its end paren.
// Lists nested in it are kept on an explicit stack, so the depth of
// the input costs no call stack.
fn slurp<S: TreeSink>(
    ts: &mut impl Iterator<Item = Result<TokenWithPos, ScanErrorWithPos>>,
    sink: &mut S,
    open: Span,
    max_depth: u32,
) -> Result<S::Node, ParseError>
{
    if max_depth == 0 {
        return Err(ReadError::NestingTooDeep.at(open.start))
    }
    let mut open = open;
    let mut v = Vec::new();
    // the enclosing lists not yet closed, innermost last
    let mut outer: Vec<(Vec<S::Node>, Span)> = Vec::new();
    while let Some(te) = ts.next() {
        let TokenWithPos(t, span) = te?;
        match t {
            Token::Open => {
                if outer.len() + 2 > max_depth as usize {
                    return Err(ReadError::NestingTooDeep.at(span.start))
                }
                outer.push((std::mem::take(&mut v), open));
                open = span;
            }
            Token::Close => {
                let node = sink.list(std::mem::take(&mut v),
                                     Span::new(open.start, span.end));
                match outer.pop() {
                    None => return Ok(node),
                    Some((parent, parent_open)) => {
                        v = parent;
                        v.push(node);
                        open = parent_open;
                    }
                }
            }
            Token::Atom(a) => {
                v.push(sink.atom(a, span));
            }
        }
    }
    Err(ReadError::PrematureEofExpectingClosingParen.at(open.start))
}

// All top-level values with their start positions.
fn slurp_toplevel<S: TreeSink>(
    text: &str,
    sink: &mut S,
    settings: &Settings,
) -> Result<Vec<(S::Node, Pos)>, ParseError>
{
    let mut ts = scan(text);
    let mut v = Vec::new();
    while let Some(te) = ts.next() {
        let TokenWithPos(t, span) = te?;
        match t {
            Token::Open => {
                v.push((slurp(&mut ts, sink, span, settings.max_depth)?, span.start));
            }
            Token::Close => {
                return Err(ReadError::UnexpectedClosingParen.at(span.start))
            }
            Token::Atom(a) => {
                v.push((sink.atom(a, span), span.start));
            }
        }
    }
    Ok(v)
}

/// Read all top-level values of `text`.
pub fn read_all<S: TreeSink>(
    text: &str,
    sink: &mut S,
    settings: &Settings,
) -> Result<Vec<S::Node>, ParseError>
{
    let v = slurp_toplevel(text, sink, settings)?;
    Ok(v.into_iter().map(|(node, _)| node).collect())
}

/// Read `text`, which must hold exactly one value. The whole text is
/// checked before looking at the number of values, so e.g. a stray
/// `)` is reported as such even after a complete value.
pub fn read_one<S: TreeSink>(
    text: &str,
    sink: &mut S,
    settings: &Settings,
) -> Result<S::Node, ParseError>
{
    let mut v = slurp_toplevel(text, sink, settings)?.into_iter();
    match (v.next(), v.next()) {
        (None, _) => Err(ReadError::NoExpression.at(Pos::START.advance_str(text))),
        (Some((node, _)), None) => Ok(node),
        (Some(_), Some((_, pos))) => Err(ReadError::TrailingExpression.at(pos)),
    }
}

/// Parse `text` holding exactly one value.
pub fn parse(text: &str) -> Result<Sexp, ParseError> {
    read_one(text, &mut PlainSink, &DEFAULT_SETTINGS)
}

/// Parse all values in `text` (possibly none).
pub fn parse_many(text: &str) -> Result<Vec<Sexp>, ParseError> {
    read_all(text, &mut PlainSink, &DEFAULT_SETTINGS)
}

/// Like [parse](parse), recording the span of every node.
pub fn parse_located(text: &str) -> Result<LocatedSexp, ParseError> {
    read_one(text, &mut LocatedSink, &DEFAULT_SETTINGS)
}

/// Like [parse_many](parse_many), recording the span of every node.
pub fn parse_many_located(text: &str) -> Result<Vec<LocatedSexp>, ParseError> {
    read_all(text, &mut LocatedSink, &DEFAULT_SETTINGS)
}
