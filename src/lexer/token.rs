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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// The lexical category of a token.
///
/// Categories serialize as the uppercase tags (`KEYWORD`, `IDENTIFIER`,
/// ...) that grammars may also reference directly as category terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// A reserved word of the active language profile.
    Keyword,
    /// A type name of the active language profile (`int`, `str`, ...).
    Datatype,
    /// A user-defined name: letter or `_`, then letters, digits, `_`.
    Identifier,
    /// An integer or decimal literal. No exponents, no leading sign.
    Number,
    /// A quoted literal. The value keeps its delimiting quotes.
    String,
    /// Arithmetic: one of `+ - * / %`.
    Operator,
    /// `== != <= >=` or a single `= < > !`.
    Comparison,
    /// `&& ||` or a single `& |`.
    Logical,
    /// `++` or `--`.
    Increment,
    /// Compound assignment: `+= -= *= /=`.
    Assignment,
    /// One of `( ) { } [ ]`.
    Bracket,
    /// One of `; , .`.
    Punctuation,
    /// Any character the scanner cannot place. Still emitted, never
    /// dropped, so the token stream stays a faithful record of the text.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Datatype => "DATATYPE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Comparison => "COMPARISON",
            TokenKind::Logical => "LOGICAL",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Assignment => "ASSIGNMENT",
            TokenKind::Bracket => "BRACKET",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::Unknown => "UNKNOWN",
        };
        f.write_str(tag)
    }
}

/// One scanned token. Immutable once created; positions are 1-based and
/// point at the first character of the lexeme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}
