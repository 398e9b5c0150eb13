/*
 * ==========================================================================
 * PARSELAB - Grammar-driven analysis for teaching compiler front ends
 * ==========================================================================
 *
 * License:
 * This file is part of the parselab project.
 *
 * parselab is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use serde::{Deserialize, Serialize};

/// A source position. Lines and columns are 1-based; a span of `0:0` marks
/// a synthesized entity with no real source location (standard-library
/// symbols, internal faults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The top-left corner of a source text.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Position of an entity that has no place in the source.
    pub fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::start()
    }
}
