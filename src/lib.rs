// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This is an S-Expression reader and printer for untyped trees of
//! atoms and lists, with the following goals:
//!
//! * Reading is fast by default: the tree built by
//!   [parse](read::parse) carries no location information.
//!
//! * Good error reporting anyway. Parse errors always carry their
//!   exact position. When converting a tree to some other type fails,
//!   [convert](convert) reads the same text a second time with
//!   locations and reports where the offending node is.
//!
//! * Printing gives the shortest text that reads back as the same
//!   tree, quoting atoms only where needed.
//!
//! The syntax:
//!
//! * **Lists** are delimited by `(` and `)` and hold values separated
//!   by whitespace (space, tab, newline, form feed).
//!
//! * **Atoms** are strings. Without quotes, an atom is any run of
//!   characters other than whitespace, `(`, `)`, `"` and `;`, and not
//!   containing `#;`, `#|` or `|#`. Enclosed in double quotes, the
//!   escapes `\"`, `\\`, `\n`, `\t`, `\r`, `\b`, `\ `, `\DDD` (three
//!   decimal digits), `\xHH` (two hex digits) and backslash-newline
//!   (line continuation, dropping the next line's indentation) are
//!   available.
//!
//! * **Comments**: `;` to the end of the line, `#;` followed by one
//!   value that is dropped, and `#| ... |#`, which nests.

pub mod chars;
pub mod context;
pub mod convert;
pub mod pos;
pub mod read;
pub mod scan;
pub mod settings;
pub mod value;

pub use convert::{convert_with_location_on_failure,
                  convert_many_with_location_on_failure,
                  ConversionError, ConvertError};
pub use read::{parse, parse_many, parse_located, parse_many_located,
               ParseError};
pub use value::{compare, print, print_many, LocatedSexp, Sexp};
