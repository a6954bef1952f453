// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Converting parsed text to other types, with locations in the
//! errors only when conversion fails.

//! Reading with spans costs time and memory proportional to the size
//! of the tree, and is wasted in the common case where conversion
//! succeeds. So the text is read without spans first; if the
//! converter then fails on some node, the same text is read again
//! with spans, and the node at the same pre-order index in the
//! located tree gives the location for the error. Parse errors don't
//! need this, they always carry their position.

use crate::context::{Context, FileContext};
use crate::pos::Span;
use crate::read::{read_all, read_one, LocatedSink, ParseErrorWithContext,
                  PlainSink};
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::value::{LocatedSexp, Sexp};
use anyhow::anyhow;
use std::fmt::{Display, Formatter};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// The failure of a converter. Converters create it from the node
/// they were looking at, which is what gets located later; the
/// reason is not interpreted.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct ConversionError {
    reason: anyhow::Error,
    sexp: Option<Sexp>,
    // address of the node the converter was given, only meaningful
    // during the conversion of the tree it points into
    origin: Option<usize>,
}

fn address_of(v: &Sexp) -> usize {
    v as *const Sexp as usize
}

impl ConversionError {
    pub fn new(reason: impl Display, at: &Sexp) -> ConversionError {
        ConversionError {
            reason: anyhow!("{}", reason),
            sexp: Some(at.clone()),
            origin: Some(address_of(at)),
        }
    }

    /// Keeping `err` as the underlying cause.
    pub fn from_error<E>(err: E, at: &Sexp) -> ConversionError
    where E: std::error::Error + Send + Sync + 'static
    {
        ConversionError {
            reason: anyhow::Error::new(err),
            sexp: Some(at.clone()),
            origin: Some(address_of(at)),
        }
    }

    /// A failure that is not about any particular node; it will be
    /// reported without a position.
    pub fn unlocalized(reason: impl Display) -> ConversionError {
        ConversionError {
            reason: anyhow!("{}", reason),
            sexp: None,
            origin: None,
        }
    }

    pub fn reason(&self) -> &anyhow::Error {
        &self.reason
    }

    /// The offending sub-tree, if any.
    pub fn sexp(&self) -> Option<&Sexp> {
        self.sexp.as_ref()
    }
}

/// A [ConversionError](ConversionError) with the source of the text
/// and, if it could be determined, the span of the offending node.
#[derive(Error, Debug)]
pub struct LocatedConversionError {
    err: ConversionError,
    span: Option<Span>,
    container: Box<dyn Context>
}

impl LocatedConversionError {
    pub fn conversion_error(&self) -> &ConversionError {
        &self.err
    }

    pub fn into_conversion_error(self) -> ConversionError {
        self.err
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn source_name(&self) -> String {
        self.container.to_string_without_pos()
    }
}

impl Display for LocatedConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ", self.err))?;
        self.container.format_with_pos(self.span.map(|s| s.start), f)
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{0}")]
    Parse(Box<ParseErrorWithContext>),
    #[error("{0}")]
    Conversion(Box<LocatedConversionError>),
}

impl ConvertError {
    /// The span of the offending node, or the position of the parse
    /// error as an empty span.
    pub fn span(&self) -> Option<Span> {
        match self {
            ConvertError::Parse(e) => {
                let pos = e.parse_error().pos();
                Some(Span::new(pos, pos))
            }
            ConvertError::Conversion(e) => e.span(),
        }
    }
}

// Pre-order index of the node `err` is about, within `roots`.
fn failing_index(roots: &[Sexp], err: &ConversionError) -> Option<usize> {
    let preorder = || roots.iter().flat_map(|v| v.preorder());
    if let Some(origin) = err.origin {
        let found = preorder().position(|v| address_of(v) == origin);
        if found.is_some() {
            return found;
        }
    }
    // The converter cloned or rebuilt the node; settle for the first
    // equal one.
    let sexp = err.sexp.as_ref()?;
    let found = preorder().position(|v| v == sexp);
    found
}

// Second pass: read `text` again with spans and find the span of the
// node `err` is about. `None` if that can't be done reliably.
fn locate(
    text: &str,
    settings: &Settings,
    roots: &[Sexp],
    err: &ConversionError,
    container: &dyn Context,
) -> Option<Span> {
    let index = failing_index(roots, err)?;
    debug!(index,
           source = %container.to_string_without_pos(),
           "conversion failed, re-reading with locations");
    let located: Vec<LocatedSexp> = match read_all(text, &mut LocatedSink, settings) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "re-reading with locations failed");
            return None;
        }
    };
    let agree = located.len() == roots.len()
        && located.iter().zip(roots).all(|(l, v)| l.congruent(v));
    if !agree {
        warn!(source = %container.to_string_without_pos(),
              "located re-read disagrees with the first read");
        return None;
    }
    let span = located.iter().flat_map(|v| v.preorder()).nth(index).map(LocatedSexp::span);
    span
}

fn conversion_failed(
    text: &str,
    settings: &Settings,
    roots: &[Sexp],
    err: ConversionError,
    container: Box<dyn Context>,
) -> ConvertError {
    let span = locate(text, settings, roots, &err, container.as_ref());
    ConvertError::Conversion(Box::new(LocatedConversionError {
        err,
        span,
        container
    }))
}

/// Parse `text` (holding exactly one value) and `convert` it; errors
/// are reported as coming from `container`.
pub fn convert_with_context<T>(
    text: &str,
    container: Box<dyn Context>,
    settings: &Settings,
    convert: impl FnOnce(&Sexp) -> Result<T, ConversionError>,
) -> Result<T, ConvertError> {
    let v = match read_one(text, &mut PlainSink, settings) {
        Ok(v) => v,
        Err(e) => return Err(ConvertError::Parse(Box::new(e.with_context(container)))),
    };
    match convert(&v) {
        Ok(t) => Ok(t),
        Err(err) => Err(conversion_failed(text, settings, std::slice::from_ref(&v),
                                          err, container)),
    }
}

/// Same as [convert_with_context](convert_with_context) for text
/// holding any number of values.
pub fn convert_many_with_context<T>(
    text: &str,
    container: Box<dyn Context>,
    settings: &Settings,
    convert: impl FnOnce(&[Sexp]) -> Result<T, ConversionError>,
) -> Result<T, ConvertError> {
    let vals = match read_all(text, &mut PlainSink, settings) {
        Ok(vals) => vals,
        Err(e) => return Err(ConvertError::Parse(Box::new(e.with_context(container)))),
    };
    match convert(&vals) {
        Ok(t) => Ok(t),
        Err(err) => Err(conversion_failed(text, settings, &vals, err, container)),
    }
}

/// Parse `text`, read from `file_name`, and `convert` it. If
/// conversion fails, the error carries file name, line, column and
/// byte offset of the offending node.
pub fn convert_with_location_on_failure<T>(
    text: &str,
    file_name: impl AsRef<Path>,
    convert: impl FnOnce(&Sexp) -> Result<T, ConversionError>,
) -> Result<T, ConvertError> {
    convert_with_context(text,
                         Box::new(FileContext::new(file_name.as_ref())),
                         &DEFAULT_SETTINGS,
                         convert)
}

pub fn convert_many_with_location_on_failure<T>(
    text: &str,
    file_name: impl AsRef<Path>,
    convert: impl FnOnce(&[Sexp]) -> Result<T, ConversionError>,
) -> Result<T, ConvertError> {
    convert_many_with_context(text,
                              Box::new(FileContext::new(file_name.as_ref())),
                              &DEFAULT_SETTINGS,
                              convert)
}
