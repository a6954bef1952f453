// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for reading (parsing) data.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// How deeply lists may nest before reading fails with
    /// `ReadError::NestingTooDeep`. Reading itself doesn't recurse;
    /// the limit is for code walking the result recursively (the
    /// derived comparisons, `Drop`, most converters).
    pub max_depth: u32,
}

pub const DEFAULT_SETTINGS : Settings = Settings {
    max_depth: 500,
};

impl Default for Settings {
    fn default() -> Settings {
        DEFAULT_SETTINGS
    }
}
