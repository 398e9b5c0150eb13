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

use crate::grammar::GrammarSymbol;

/// The end-of-stack sentinel on both parse stacks.
pub const END_MARKER: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackKind {
    Terminal,
    NonTerminal,
    Epsilon,
    EndMarker,
}

/// One entry on the input or output stack of a derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackItem {
    #[serde(rename = "type")]
    pub kind: StackKind,
    pub value: String,
}

impl StackItem {
    pub fn terminal(value: impl Into<String>) -> Self {
        Self {
            kind: StackKind::Terminal,
            value: value.into(),
        }
    }

    pub fn non_terminal(value: impl Into<String>) -> Self {
        Self {
            kind: StackKind::NonTerminal,
            value: value.into(),
        }
    }

    pub fn end_marker() -> Self {
        Self {
            kind: StackKind::EndMarker,
            value: END_MARKER.to_string(),
        }
    }

    pub fn from_symbol(symbol: &GrammarSymbol) -> Self {
        match symbol {
            GrammarSymbol::Terminal(value) => Self::terminal(value.clone()),
            GrammarSymbol::NonTerminal(value) => Self::non_terminal(value.clone()),
            GrammarSymbol::Epsilon => Self {
                kind: StackKind::Epsilon,
                value: "ε".to_string(),
            },
        }
    }

    pub fn is_end_marker(&self) -> bool {
        self.kind == StackKind::EndMarker
    }
}
