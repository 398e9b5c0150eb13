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

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{Grammar, GrammarSymbol, Production};
use crate::error::GrammarError;

/// Bare words recognized as token-category terminals even though they look
/// like non-terminals. Checked before the uppercase rule.
const CATEGORY_WORDS: [&str; 3] = ["IDENTIFIER", "NUMBER", "STRING"];

pub(super) fn parse_grammar(text: &str) -> Result<Grammar, GrammarError> {
    let mut start_symbol = String::new();
    let mut productions: HashMap<String, Vec<Production>> = HashMap::new();
    let mut terminals: HashSet<String> = HashSet::new();
    let mut non_terminals: HashSet<String> = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let malformed = || GrammarError::MalformedLine {
            line: index + 1,
            text: line.to_string(),
        };

        if line.matches("->").count() != 1 {
            return Err(malformed());
        }
        let (left, right) = line.split_once("->").ok_or_else(malformed)?;
        let left = left.trim();
        if left.is_empty() {
            return Err(malformed());
        }

        if start_symbol.is_empty() {
            start_symbol = left.to_string();
        }
        non_terminals.insert(left.to_string());

        let entry = productions.entry(left.to_string()).or_default();
        for alternative in split_alternatives(right) {
            let symbols = parse_alternative(&alternative);
            for symbol in &symbols {
                match symbol {
                    GrammarSymbol::Terminal(value) => {
                        terminals.insert(value.clone());
                    }
                    GrammarSymbol::NonTerminal(value) => {
                        non_terminals.insert(value.clone());
                    }
                    GrammarSymbol::Epsilon => {}
                }
            }
            entry.push(symbols);
        }
    }

    if start_symbol.is_empty() {
        return Err(GrammarError::NoStartSymbol);
    }

    debug!(
        start = %start_symbol,
        rules = productions.len(),
        "grammar loaded"
    );

    Ok(Grammar::from_parts(
        start_symbol,
        productions,
        terminals,
        non_terminals,
    ))
}

/// Splits a right-hand side on `|`, ignoring pipes inside quoted spans.
fn split_alternatives(right: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in right.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '|' => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    parts.push(current.trim().to_string());
    parts
}

/// Tokenizes one alternative into symbols, left to right:
/// quoted span -> terminal, `ε`/`epsilon` -> epsilon, category word ->
/// terminal, uppercase run -> non-terminal, anything else -> a terminal
/// bounded by whitespace or a quote.
fn parse_alternative(alternative: &str) -> Production {
    let chars: Vec<char> = alternative.chars().collect();
    let mut symbols = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let ch = chars[i];
        if ch == '"' || ch == '\'' {
            let quote = ch;
            i += 1;
            let mut value = String::new();
            while i < chars.len() && chars[i] != quote {
                value.push(chars[i]);
                i += 1;
            }
            if i < chars.len() {
                i += 1; // close quote
            }
            symbols.push(GrammarSymbol::Terminal(value));
        } else if ch == 'ε' {
            symbols.push(GrammarSymbol::Epsilon);
            i += 1;
        } else if word_at(&chars, i, "epsilon") {
            symbols.push(GrammarSymbol::Epsilon);
            i += "epsilon".len();
        } else if ch.is_ascii_uppercase() {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_uppercase() || chars[i].is_ascii_digit() || chars[i] == '_')
            {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if CATEGORY_WORDS.contains(&word.as_str()) {
                symbols.push(GrammarSymbol::Terminal(word));
            } else {
                symbols.push(GrammarSymbol::NonTerminal(word));
            }
        } else {
            let start = i;
            while i < chars.len()
                && !chars[i].is_whitespace()
                && chars[i] != '"'
                && chars[i] != '\''
            {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if !word.is_empty() {
                symbols.push(GrammarSymbol::Terminal(word));
            }
        }
    }

    symbols
}

/// True when `word` occurs at `i` as a whole word (bounded by whitespace, a
/// quote, or end of text).
fn word_at(chars: &[char], i: usize, word: &str) -> bool {
    let needle: Vec<char> = word.chars().collect();
    if i + needle.len() > chars.len() || chars[i..i + needle.len()] != needle[..] {
        return false;
    }
    match chars.get(i + needle.len()) {
        None => true,
        Some(next) => next.is_whitespace() || *next == '"' || *next == '\'',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(value: &str) -> GrammarSymbol {
        GrammarSymbol::Terminal(value.to_string())
    }

    fn non_terminal(value: &str) -> GrammarSymbol {
        GrammarSymbol::NonTerminal(value.to_string())
    }

    #[test]
    fn one_rule_per_distinct_lhs() {
        let grammar = Grammar::parse("S -> A B\nA -> \"a\"\nB -> \"b\"\n").unwrap();
        assert_eq!(grammar.rule_count(), 3);
        assert_eq!(grammar.start_symbol(), "S");
    }

    #[test]
    fn repeated_lhs_appends_alternatives() {
        let grammar = Grammar::parse("A -> \"a\"\nA -> \"b\"").unwrap();
        assert_eq!(grammar.rule_count(), 1);
        assert_eq!(grammar.productions_for("A").len(), 2);
    }

    #[test]
    fn missing_arrow_is_malformed() {
        let err = Grammar::parse("S -> A\nA \"a\"").unwrap_err();
        assert_eq!(
            err,
            GrammarError::MalformedLine {
                line: 2,
                text: "A \"a\"".to_string()
            }
        );
    }

    #[test]
    fn doubled_arrow_is_malformed() {
        let err = Grammar::parse("S -> A -> B").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn empty_grammar_has_no_start_symbol() {
        assert_eq!(Grammar::parse("").unwrap_err(), GrammarError::NoStartSymbol);
        assert_eq!(
            Grammar::parse("// only a comment\n\n").unwrap_err(),
            GrammarError::NoStartSymbol
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let grammar = Grammar::parse("// header\n\nS -> \"x\"\n").unwrap();
        assert_eq!(grammar.start_symbol(), "S");
        assert_eq!(grammar.rule_count(), 1);
    }

    #[test]
    fn alternatives_split_on_pipe() {
        let grammar = Grammar::parse("A -> \"a\" A | \"a\"").unwrap();
        let alternatives = grammar.productions_for("A");
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0], vec![terminal("a"), non_terminal("A")]);
        assert_eq!(alternatives[1], vec![terminal("a")]);
    }

    #[test]
    fn quoted_pipe_does_not_split() {
        let grammar = Grammar::parse("SYM -> \"|\" | \"&\"").unwrap();
        let alternatives = grammar.productions_for("SYM");
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0], vec![terminal("|")]);
    }

    #[test]
    fn epsilon_in_both_spellings() {
        let grammar = Grammar::parse("A -> \"a\" | ε\nB -> epsilon").unwrap();
        assert_eq!(grammar.productions_for("A")[1], vec![GrammarSymbol::Epsilon]);
        assert_eq!(grammar.productions_for("B")[0], vec![GrammarSymbol::Epsilon]);
    }

    #[test]
    fn category_words_load_as_terminals() {
        let grammar = Grammar::parse("FACTOR -> NUMBER | STRING | IDENTIFIER | CALL").unwrap();
        let alternatives = grammar.productions_for("FACTOR");
        assert_eq!(alternatives[0], vec![terminal("NUMBER")]);
        assert_eq!(alternatives[1], vec![terminal("STRING")]);
        assert_eq!(alternatives[2], vec![terminal("IDENTIFIER")]);
        assert_eq!(alternatives[3], vec![non_terminal("CALL")]);
        assert!(grammar.is_terminal("NUMBER"));
        assert!(grammar.is_non_terminal("CALL"));
    }

    #[test]
    fn uppercase_run_is_maximal() {
        let grammar = Grammar::parse("S -> IDENTIFIERS").unwrap();
        assert_eq!(
            grammar.productions_for("S")[0],
            vec![non_terminal("IDENTIFIERS")]
        );
    }

    #[test]
    fn unquoted_words_are_terminals() {
        let grammar = Grammar::parse("S -> if \"(\" COND \")\"").unwrap();
        assert_eq!(
            grammar.productions_for("S")[0],
            vec![
                terminal("if"),
                terminal("("),
                non_terminal("COND"),
                terminal(")")
            ]
        );
    }

    #[test]
    fn summary_is_sorted_and_complete() {
        let grammar = Grammar::parse("S -> A\nA -> \"a\"").unwrap();
        let data = grammar.summary();
        assert_eq!(data.start_symbol, "S");
        assert_eq!(data.productions.len(), 2);
        assert_eq!(data.non_terminals, vec!["A".to_string(), "S".to_string()]);
        assert_eq!(data.terminals, vec!["a".to_string()]);
    }
}
