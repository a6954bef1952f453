// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get characters and their positions from the input text.

//! The scanner needs two characters of lookahead (`#;`, `#|`, `|#`),
//! which is why this is a cursor and not just an iterator (although it
//! is that, too).

use crate::pos::Pos;

#[derive(Debug, Clone)]
pub struct Chars<'s> {
    rest: &'s str,
    pos: Pos,
}

impl<'s> Chars<'s> {
    pub fn new(text: &'s str) -> Chars<'s> {
        Chars { rest: text, pos: Pos::START }
    }

    /// The position of the next character (or of the end of input).
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// The character after the next one.
    pub fn peek2(&self) -> Option<char> {
        let mut cs = self.rest.chars();
        cs.next()?;
        cs.next()
    }

    /// Whether the next two characters are `a` and `b`.
    pub fn at_pair(&self, a: char, b: char) -> bool {
        self.peek() == Some(a) && self.peek2() == Some(b)
    }
}

impl<'s> Iterator for Chars<'s> {
    type Item = (char, Pos);

    fn next(&mut self) -> Option<(char, Pos)> {
        let c = self.peek()?;
        let pos = self.pos;
        self.rest = &self.rest[c.len_utf8()..];
        self.pos = pos.advance(c);
        Some((c, pos))
    }
}
