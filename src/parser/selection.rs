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

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::grammar::{Grammar, GrammarSymbol, Production};

/// How deep the leading-symbol probe follows non-terminal chains. A bounded
/// probe, not a FIRST set: no fixpoint, no epsilon closure.
const PROBE_DEPTH: usize = 8;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("number pattern"));

/// A named-production override registered by a language profile: when
/// expanding `non_terminal` and the lookahead fits `key`, prefer the
/// alternative whose leading symbol is named in `prefer`. A pluggable
/// lookup table for the bundled toy grammars, not a general algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionHint {
    pub non_terminal: String,
    pub key: HintKey,
    pub prefer: Vec<String>,
}

impl ProductionHint {
    pub fn keyword(
        non_terminal: impl Into<String>,
        keyword: impl Into<String>,
        prefer: &[&str],
    ) -> Self {
        Self {
            non_terminal: non_terminal.into(),
            key: HintKey::Keyword(keyword.into()),
            prefer: prefer.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn identifier(non_terminal: impl Into<String>, prefer: &[&str]) -> Self {
        Self {
            non_terminal: non_terminal.into(),
            key: HintKey::AnyIdentifier,
            prefer: prefer.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn operand(non_terminal: impl Into<String>, prefer: &[&str]) -> Self {
        Self {
            non_terminal: non_terminal.into(),
            key: HintKey::AnyOperand,
            prefer: prefer.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The lookahead shape a hint fires on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum HintKey {
    /// The lookahead is exactly this keyword.
    Keyword(String),
    /// The lookahead is identifier-shaped and not a keyword.
    AnyIdentifier,
    /// The lookahead is identifier-, number- or string-shaped.
    AnyOperand,
}

pub(crate) fn is_identifier_shaped(value: &str, keywords: &[String]) -> bool {
    IDENTIFIER_RE.is_match(value) && !keywords.iter().any(|k| k == value)
}

pub(crate) fn is_number_shaped(value: &str) -> bool {
    NUMBER_RE.is_match(value)
}

pub(crate) fn is_string_shaped(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), value.chars().last()) {
        (Some(first), Some(last)) if value.chars().count() >= 2 => {
            (first == '"' && last == '"') || (first == '\'' && last == '\'')
        }
        _ => false,
    }
}

/// Category-word match only: `IDENTIFIER`, `NUMBER`, `STRING`, `KEYWORD`
/// against the token's lexical shape.
pub(crate) fn matches_category(expected: &str, actual: &str, keywords: &[String]) -> bool {
    match expected {
        "IDENTIFIER" => is_identifier_shaped(actual, keywords),
        "NUMBER" => is_number_shaped(actual),
        "STRING" => is_string_shaped(actual),
        "KEYWORD" => keywords.iter().any(|k| k == actual),
        _ => false,
    }
}

/// Exact value or category word. Used everywhere during production
/// selection.
pub(crate) fn matches_strict(expected: &str, actual: &str, keywords: &[String]) -> bool {
    expected == actual || matches_category(expected, actual, keywords)
}

/// Picks the production used to expand a non-terminal against the current
/// lookahead. Deterministic and bounded; deliberately weaker than LL(1)
/// table construction.
pub(crate) struct Selector<'a> {
    grammar: &'a Grammar,
    keywords: &'a [String],
    hints: &'a [ProductionHint],
}

impl<'a> Selector<'a> {
    pub fn new(grammar: &'a Grammar, keywords: &'a [String], hints: &'a [ProductionHint]) -> Self {
        Self {
            grammar,
            keywords,
            hints,
        }
    }

    /// Returns the index of the chosen alternative, or `None` when the
    /// non-terminal has no productions at all.
    ///
    /// Order of preference: profile hints, then alternatives whose leading
    /// symbol can start with the lookahead (ties broken by the following
    /// input token against the second symbol), then an epsilon alternative,
    /// then the first-listed alternative.
    pub fn select(&self, non_terminal: &str, lookahead: &str, next: Option<&str>) -> Option<usize> {
        let alternatives = self.grammar.productions_for(non_terminal);
        if alternatives.is_empty() {
            return None;
        }

        if let Some(index) = self.select_by_hint(non_terminal, lookahead, alternatives) {
            return Some(index);
        }

        let candidates: Vec<usize> = (0..alternatives.len())
            .filter(|&i| self.leads_with(&alternatives[i], lookahead))
            .collect();

        match candidates.as_slice() {
            [] => Some(self.fallback(alternatives)),
            [only] => Some(*only),
            _ => {
                // Several alternatives start with the lookahead. Let the
                // next token break the tie against each second symbol;
                // single-symbol alternatives come last.
                for &i in &candidates {
                    if self.second_symbol_matches(&alternatives[i], next) {
                        return Some(i);
                    }
                }
                for &i in &candidates {
                    if alternatives[i].len() < 2 {
                        return Some(i);
                    }
                }
                Some(candidates[0])
            }
        }
    }

    fn select_by_hint(
        &self,
        non_terminal: &str,
        lookahead: &str,
        alternatives: &[Production],
    ) -> Option<usize> {
        for hint in self.hints.iter().filter(|h| h.non_terminal == non_terminal) {
            let applies = match &hint.key {
                HintKey::Keyword(keyword) => lookahead == keyword,
                HintKey::AnyIdentifier => is_identifier_shaped(lookahead, self.keywords),
                HintKey::AnyOperand => {
                    is_identifier_shaped(lookahead, self.keywords)
                        || is_number_shaped(lookahead)
                        || is_string_shaped(lookahead)
                }
            };
            if !applies {
                continue;
            }
            for preferred in &hint.prefer {
                let found = alternatives.iter().position(|alternative| {
                    alternative
                        .first()
                        .map(|symbol| symbol.value() == preferred)
                        .unwrap_or(false)
                });
                if let Some(index) = found {
                    return Some(index);
                }
            }
        }
        None
    }

    fn leads_with(&self, alternative: &Production, lookahead: &str) -> bool {
        match alternative.first() {
            Some(GrammarSymbol::Terminal(terminal)) => {
                matches_strict(terminal, lookahead, self.keywords)
            }
            Some(GrammarSymbol::NonTerminal(name)) => {
                self.derives_leading(name, lookahead, 0, &mut Vec::new())
            }
            _ => false,
        }
    }

    /// Can `non_terminal` put a symbol matching `lookahead` in leading
    /// position? Follows leading non-terminals only, cycle-guarded and
    /// depth-bounded.
    fn derives_leading(
        &self,
        non_terminal: &str,
        lookahead: &str,
        depth: usize,
        path: &mut Vec<String>,
    ) -> bool {
        if depth >= PROBE_DEPTH || path.iter().any(|seen| seen == non_terminal) {
            return false;
        }
        path.push(non_terminal.to_string());
        let mut found = false;
        for alternative in self.grammar.productions_for(non_terminal) {
            match alternative.first() {
                Some(GrammarSymbol::Terminal(terminal))
                    if matches_strict(terminal, lookahead, self.keywords) =>
                {
                    found = true;
                }
                Some(GrammarSymbol::NonTerminal(name))
                    if self.derives_leading(name, lookahead, depth + 1, path) =>
                {
                    found = true;
                }
                _ => {}
            }
            if found {
                break;
            }
        }
        path.pop();
        found
    }

    fn second_symbol_matches(&self, alternative: &Production, next: Option<&str>) -> bool {
        let Some(next) = next else {
            return false;
        };
        match alternative.get(1) {
            Some(GrammarSymbol::Terminal(terminal)) => {
                matches_strict(terminal, next, self.keywords)
            }
            Some(GrammarSymbol::NonTerminal(name)) => {
                self.derives_leading(name, next, 0, &mut Vec::new())
            }
            _ => false,
        }
    }

    fn fallback(&self, alternatives: &[Production]) -> usize {
        alternatives
            .iter()
            .position(|alternative| {
                matches!(alternative.first(), Some(GrammarSymbol::Epsilon))
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_keywords() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn identifier_shape_excludes_keywords() {
        let keywords = vec!["if".to_string()];
        assert!(is_identifier_shaped("factorial", &keywords));
        assert!(is_identifier_shaped("_x9", &keywords));
        assert!(!is_identifier_shaped("if", &keywords));
        assert!(!is_identifier_shaped("9x", &keywords));
        assert!(!is_identifier_shaped("$", &keywords));
    }

    #[test]
    fn number_and_string_shapes() {
        assert!(is_number_shaped("42"));
        assert!(is_number_shaped("3.14"));
        assert!(!is_number_shaped("3."));
        assert!(is_string_shaped("\"hi\""));
        assert!(is_string_shaped("'hi'"));
        assert!(!is_string_shaped("\"open"));
        assert!(!is_string_shaped("x"));
    }

    #[test]
    fn category_words_match_shapes() {
        let keywords = vec!["while".to_string()];
        assert!(matches_strict("IDENTIFIER", "count", &keywords));
        assert!(!matches_strict("IDENTIFIER", "while", &keywords));
        assert!(matches_strict("NUMBER", "10", &keywords));
        assert!(matches_strict("STRING", "'s'", &keywords));
        assert!(matches_strict("KEYWORD", "while", &keywords));
        assert!(matches_strict("x", "x", &keywords));
        assert!(!matches_strict("x", "y", &keywords));
    }

    #[test]
    fn recursive_alternative_wins_while_input_continues() {
        let grammar = Grammar::parse("A -> \"a\" A | \"a\"").unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        // more input ahead: keep recursing
        assert_eq!(selector.select("A", "a", Some("a")), Some(0));
        // end marker next: close the recursion
        assert_eq!(selector.select("A", "a", Some("$")), Some(1));
    }

    #[test]
    fn epsilon_is_chosen_only_as_fallback() {
        let grammar = Grammar::parse("T -> \"b\" | ε").unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        assert_eq!(selector.select("T", "b", Some("$")), Some(0));
        assert_eq!(selector.select("T", "$", None), Some(1));
    }

    #[test]
    fn probe_follows_leading_non_terminals() {
        let grammar =
            Grammar::parse("S -> STMT REST | STMT\nREST -> STMT REST | STMT\nSTMT -> \"x\" \"x\"")
                .unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        // REST can lead with "x" two levels down, so the longer
        // alternative survives the tiebreak
        assert_eq!(selector.select("S", "x", Some("x")), Some(0));
        // when the next token justifies nothing, the single-symbol
        // alternative wins
        assert_eq!(selector.select("S", "x", Some("$")), Some(1));
    }

    #[test]
    fn unknown_lookahead_falls_back_to_first() {
        let grammar = Grammar::parse("A -> \"a\" | \"b\"").unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        assert_eq!(selector.select("A", "?", None), Some(0));
    }

    #[test]
    fn missing_non_terminal_selects_nothing() {
        let grammar = Grammar::parse("A -> \"a\"").unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        assert_eq!(selector.select("B", "a", None), None);
    }

    #[test]
    fn hints_override_ordering() {
        let grammar = Grammar::parse(
            "STATEMENT -> ASSIGNMENT | IF_STATEMENT\nASSIGNMENT -> IDENTIFIER \"=\" NUMBER\nIF_STATEMENT -> \"if\" IDENTIFIER",
        )
        .unwrap();
        let keywords = vec!["if".to_string()];
        let hints = vec![ProductionHint::keyword("STATEMENT", "if", &["IF_STATEMENT"])];
        let selector = Selector::new(&grammar, &keywords, &hints);
        assert_eq!(selector.select("STATEMENT", "if", Some("x")), Some(1));
        // without a firing hint the normal probe applies
        assert_eq!(selector.select("STATEMENT", "x", Some("=")), Some(0));
    }

    #[test]
    fn left_recursion_does_not_hang_the_probe() {
        let grammar = Grammar::parse("E -> E \"+\" E | \"n\"").unwrap();
        let keywords = no_keywords();
        let selector = Selector::new(&grammar, &keywords, &[]);
        assert_eq!(selector.select("E", "n", Some("$")), Some(1));
    }
}
