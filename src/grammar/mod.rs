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

mod loader;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::GrammarError;

/// The base unit in a grammar rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum GrammarSymbol {
    /// Matched directly against input tokens, either literally or as a
    /// token category (`IDENTIFIER`, `NUMBER`, `STRING`).
    Terminal(String),
    /// Expanded via one of its productions.
    NonTerminal(String),
    /// The empty production symbol. Consumes no input.
    Epsilon,
}

impl GrammarSymbol {
    pub fn value(&self) -> &str {
        match self {
            GrammarSymbol::Terminal(value) | GrammarSymbol::NonTerminal(value) => value,
            GrammarSymbol::Epsilon => "ε",
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, GrammarSymbol::Epsilon)
    }
}

/// One right-hand-side alternative: an ordered sequence of symbols.
pub type Production = Vec<GrammarSymbol>;

/// A context-free grammar in the simplified BNF notation.
///
/// Rules are `LHS -> RHS1 | RHS2`, one per line; `//` lines and blank lines
/// are ignored; the first left-hand side becomes the start symbol. Whether
/// every referenced non-terminal actually has productions is not checked at
/// load time; a missing entry surfaces as a parse-time diagnostic instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grammar {
    start_symbol: String,
    productions: HashMap<String, Vec<Production>>,
    terminals: HashSet<String>,
    non_terminals: HashSet<String>,
}

impl Grammar {
    /// Parses grammar text. Fails with `MalformedLine` on a rule line
    /// without exactly one `->`, or `NoStartSymbol` when no rule line
    /// exists at all.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        loader::parse_grammar(text)
    }

    pub(crate) fn from_parts(
        start_symbol: String,
        productions: HashMap<String, Vec<Production>>,
        terminals: HashSet<String>,
        non_terminals: HashSet<String>,
    ) -> Self {
        Self {
            start_symbol,
            productions,
            terminals,
            non_terminals,
        }
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// The ordered alternatives for `non_terminal`; empty when the grammar
    /// never defines it.
    pub fn productions_for(&self, non_terminal: &str) -> &[Production] {
        self.productions
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_productions(&self, non_terminal: &str) -> bool {
        !self.productions_for(non_terminal).is_empty()
    }

    /// Number of non-terminals that have at least one production.
    pub fn rule_count(&self) -> usize {
        self.productions.len()
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(Vec::len).sum()
    }

    /// A flattened, deterministic summary for presentation collaborators.
    pub fn summary(&self) -> GrammarData {
        let mut lefts: Vec<&String> = self.productions.keys().collect();
        lefts.sort();

        let mut productions = Vec::new();
        for left in lefts {
            for right in &self.productions[left] {
                productions.push(ProductionRule {
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }

        let mut terminals: Vec<String> = self.terminals.iter().cloned().collect();
        terminals.sort();
        let mut non_terminals: Vec<String> = self.non_terminals.iter().cloned().collect();
        non_terminals.sort();

        GrammarData {
            start_symbol: self.start_symbol.clone(),
            productions,
            terminals,
            non_terminals,
        }
    }
}

/// One `left -> right` pair in a flattened grammar summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRule {
    pub left: String,
    pub right: Production,
}

/// Flattened grammar view, sorted for stable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarData {
    pub start_symbol: String,
    pub productions: Vec<ProductionRule>,
    pub terminals: Vec<String>,
    pub non_terminals: Vec<String>,
}
