// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data types representing an S-expression value, and their
//! printed form.

//! [Sexp](Sexp) is the plain tree that the fast reading path builds
//! and that conversion code matches on. [LocatedSexp](LocatedSexp) is
//! the same tree with a [Span](crate::pos::Span) on every node; it is
//! only built on request. Neither can represent cycles or sharing.

use crate::pos::Span;
use crate::scan::is_delimiter_char;
use genawaiter::rc::Gen;
use kstring::KString;
use std::cmp::Ordering;
use std::fmt::Write;

/// An S-expression: an atom (an uninterpreted string, already
/// unescaped) or a list of S-expressions. Ordering is structural,
/// with every atom sorting before every list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sexp {
    Atom(KString),
    List(Vec<Sexp>),
}

/// Structural total order, same as `Ord`.
pub fn compare(a: &Sexp, b: &Sexp) -> Ordering {
    a.cmp(b)
}

/// Easily create an atom
pub fn atom(s: &str) -> Sexp {
    Sexp::Atom(KString::from_ref(s))
}

/// Easily create a list
pub fn list(items: impl IntoIterator<Item = Sexp>) -> Sexp {
    Sexp::List(items.into_iter().collect())
}

impl Sexp {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexp::Atom(a) => Some(a.as_str()),
            Sexp::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::Atom(_) => None,
            Sexp::List(items) => Some(items),
        }
    }

    /// All nodes, parents before their children, children in order.
    pub fn preorder<'t>(&'t self) -> impl Iterator<Item = &'t Sexp> + 't {
        Gen::new(|co| async move {
            let mut stack = vec![self];
            while let Some(v) = stack.pop() {
                co.yield_(v).await;
                if let Sexp::List(items) = v {
                    stack.extend(items.iter().rev());
                }
            }
        }).into_iter()
    }
}

impl From<&str> for Sexp {
    fn from(s: &str) -> Sexp {
        atom(s)
    }
}

impl From<String> for Sexp {
    fn from(s: String) -> Sexp {
        Sexp::Atom(KString::from_string(s))
    }
}

impl From<Vec<Sexp>> for Sexp {
    fn from(items: Vec<Sexp>) -> Sexp {
        Sexp::List(items)
    }
}

/// Whether an atom can't be printed verbatim without being read back
/// differently.
pub fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars().any(|c| is_delimiter_char(c) || c.is_ascii_control())
        || s.contains("#;")
        || s.contains("#|")
        || s.contains("|#")
}

pub fn fmt_atom(f: &mut std::fmt::Formatter<'_>, s: &str)
                -> Result<(), std::fmt::Error> {
    if !needs_quotes(s) {
        return f.write_str(s);
    }
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\x08' => f.write_str("\\b")?,
            c if c.is_ascii_control() =>
                f.write_fmt(format_args!("\\{:03}", c as u32))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

// What the printer needs to see of a tree node.
enum Shape<'t, T> {
    Atom(&'t str),
    List(&'t [T]),
}

trait Tree: Sized {
    fn shape(&self) -> Shape<'_, Self>;
}

impl Tree for Sexp {
    fn shape(&self) -> Shape<'_, Sexp> {
        match self {
            Sexp::Atom(a) => Shape::Atom(a.as_str()),
            Sexp::List(items) => Shape::List(items),
        }
    }
}

impl Tree for LocatedSexp {
    fn shape(&self) -> Shape<'_, LocatedSexp> {
        match self {
            LocatedSexp::Atom(a, _) => Shape::Atom(a.as_str()),
            LocatedSexp::List(items, _) => Shape::List(items),
        }
    }
}

// Iterative, so that trees of any depth can be printed.
fn fmt_tree<'t, T: Tree>(
    f: &mut std::fmt::Formatter<'_>,
    root: &'t T,
) -> Result<(), std::fmt::Error> {
    // per open list: the items left, and whether none was printed yet
    let mut stack: Vec<(std::slice::Iter<'t, T>, bool)> = Vec::new();
    let mut v = root;
    loop {
        match v.shape() {
            Shape::Atom(a) => fmt_atom(f, a)?,
            Shape::List(items) => {
                f.write_char('(')?;
                stack.push((items.iter(), true));
            }
        }
        loop {
            let Some((items, first)) = stack.last_mut() else {
                return Ok(())
            };
            match items.next() {
                Some(item) => {
                    if !*first {
                        f.write_char(' ')?;
                    }
                    *first = false;
                    v = item;
                    break;
                }
                None => {
                    f.write_char(')')?;
                    stack.pop();
                }
            }
        }
    }
}

impl std::fmt::Display for Sexp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        fmt_tree(f, self)
    }
}

/// The shortest text that reads back as `v`. Reading it back with
/// [parse](crate::read::parse) needs `v` to be nested no deeper than
/// [DEFAULT_SETTINGS](crate::settings::DEFAULT_SETTINGS) allow; use
/// [read_one](crate::read::read_one) with a larger `max_depth` for
/// deeper trees.
pub fn print(v: &Sexp) -> String {
    v.to_string()
}

/// Each value on its own line; reads back with `parse_many`.
pub fn print_many<'t>(vals: impl IntoIterator<Item = &'t Sexp>) -> String {
    let mut out = String::new();
    for v in vals {
        // Writing into a String can't fail.
        let _ = writeln!(out, "{}", v);
    }
    out
}

/// A [Sexp](Sexp) with the span of every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatedSexp {
    Atom(KString, Span),
    List(Vec<LocatedSexp>, Span),
}

impl LocatedSexp {
    /// For lists, from the opening paren to right after the closing
    /// one; for quoted atoms, including the quotes.
    pub fn span(&self) -> Span {
        match self {
            LocatedSexp::Atom(_, span) | LocatedSexp::List(_, span) => *span,
        }
    }

    /// Drop the spans.
    pub fn to_sexp(&self) -> Sexp {
        match self {
            LocatedSexp::Atom(a, _) => Sexp::Atom(a.clone()),
            LocatedSexp::List(items, _) =>
                Sexp::List(items.iter().map(LocatedSexp::to_sexp).collect()),
        }
    }

    /// Same shape and atoms as `v`, ignoring spans.
    pub fn congruent(&self, v: &Sexp) -> bool {
        match (self, v) {
            (LocatedSexp::Atom(a, _), Sexp::Atom(b)) => a == b,
            (LocatedSexp::List(xs, _), Sexp::List(ys)) =>
                xs.len() == ys.len()
                && xs.iter().zip(ys).all(|(x, y)| x.congruent(y)),
            _ => false,
        }
    }

    /// All nodes, in the same order as [Sexp::preorder](Sexp::preorder).
    pub fn preorder<'t>(&'t self) -> impl Iterator<Item = &'t LocatedSexp> + 't {
        Gen::new(|co| async move {
            let mut stack = vec![self];
            while let Some(v) = stack.pop() {
                co.yield_(v).await;
                if let LocatedSexp::List(items, _) = v {
                    stack.extend(items.iter().rev());
                }
            }
        }).into_iter()
    }
}

impl std::fmt::Display for LocatedSexp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        fmt_tree(f, self)
    }
}
