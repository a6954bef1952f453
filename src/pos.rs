// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// A position in the input text. `offset` is the zero based byte
/// offset, `line` is 1-based, `col` is zero based and counts
/// characters, not bytes (the Emacs convention).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const START: Pos = Pos { offset: 0, line: 1, col: 0 };

    /// The position right after `c`, if `c` is at `self`.
    pub fn advance(self, c: char) -> Pos {
        if c == '\n' {
            Pos { offset: self.offset + 1, line: self.line + 1, col: 0 }
        } else {
            Pos {
                offset: self.offset + c.len_utf8(),
                line: self.line,
                col: self.col + 1,
            }
        }
    }

    /// The position right after `s`, if `s` starts at `self`.
    pub fn advance_str(self, s: &str) -> Pos {
        s.chars().fold(self, Pos::advance)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        // This, when prefixed with a Debug style path string, is
        // following the Emacs convention for location information.
        f.write_fmt(format_args!("@{}.{}", self.line, self.col))
    }
}

/// The source text covered by a token or a tree node; `end` is the
/// position right after the last character.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub fn new(start: Pos, end: Pos) -> Span {
        Span { start, end }
    }

    /// Whether `other` lies within `self` (bounds included).
    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset
            && other.end.offset <= self.end.offset
    }

    /// The part of `text` covered by the span; `text` has to be the
    /// input the span was produced from.
    pub fn slice<'s>(&self, text: &'s str) -> Option<&'s str> {
        text.get(self.start.offset..self.end.offset)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{}-{}.{}",
                                 self.start,
                                 self.end.line,
                                 self.end.col))
    }
}
