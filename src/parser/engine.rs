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

use std::collections::VecDeque;

use tracing::debug;

use super::selection::{
    is_identifier_shaped, matches_category, ProductionHint, Selector,
};
use super::stack::{StackItem, StackKind};
use super::trace::StackSnapshot;
use super::tree::{NodeKind, TreeArena};
use super::ParseOutcome;
use crate::diagnostics::Diagnostic;
use crate::grammar::{Grammar, GrammarSymbol};
use crate::lexer::Token;
use crate::span::Span;

/// Ceiling on simulation steps. The circuit breaker against grammars that
/// expand without consuming input (left recursion and friends).
const MAX_STEPS: usize = 1000;

/// The stack-based top-down derivation engine.
///
/// Runs a two-stack shift/expand simulation: the input stack holds the
/// remaining tokens ahead of an end marker, the output stack holds the
/// pending grammar symbols. Every step is recorded as a snapshot, every
/// diagnosed condition recovers locally, and the tree is built in lock-step
/// with output-stack expansion.
pub struct DerivationEngine<'a> {
    grammar: &'a Grammar,
    keywords: &'a [String],
    hints: &'a [ProductionHint],
}

/// An input-stack entry. Keeps the originating token alongside the stack
/// item so consumed terminals land in the tree with their source position.
struct InputEntry {
    item: StackItem,
    token: Option<Token>,
}

impl<'a> DerivationEngine<'a> {
    /// Engine for a bare grammar, with no language profile attached.
    pub fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            keywords: &[],
            hints: &[],
        }
    }

    /// Engine with a profile's keyword vocabulary and named-production
    /// overrides.
    pub fn with_profile(
        grammar: &'a Grammar,
        keywords: &'a [String],
        hints: &'a [ProductionHint],
    ) -> Self {
        Self {
            grammar,
            keywords,
            hints,
        }
    }

    /// Derives `tokens` from the grammar's start symbol.
    ///
    /// Always returns a tree (at worst the lone start-symbol node), a
    /// non-empty trace, and the diagnostics gathered along the way.
    /// `success` is true only for a clean run to the double end marker.
    pub fn parse(&self, tokens: &[Token]) -> ParseOutcome {
        let selector = Selector::new(self.grammar, self.keywords, self.hints);

        let mut input: VecDeque<InputEntry> = tokens
            .iter()
            .map(|token| InputEntry {
                item: StackItem::terminal(token.value.clone()),
                token: Some(token.clone()),
            })
            .collect();
        input.push_back(InputEntry {
            item: StackItem::end_marker(),
            token: None,
        });

        let mut output: Vec<StackItem> = vec![
            StackItem::end_marker(),
            StackItem::non_terminal(self.grammar.start_symbol()),
        ];

        let mut arena = TreeArena::new();
        let root = arena.add(self.grammar.start_symbol(), NodeKind::NonTerminal);
        // Tree nodes pending a match, aligned with the output stack above
        // the end marker.
        let mut shadow: Vec<usize> = vec![root];

        let mut trace: Vec<StackSnapshot> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut last_span = Span::start();
        let mut steps = 0;
        let mut completed = false;

        record(&mut trace, &input, &output, "Initialization");

        while steps < MAX_STEPS {
            steps += 1;

            let output_done = output.len() == 1 && output[0].is_end_marker();
            let input_done = input.len() == 1 && input[0].item.is_end_marker();
            if output_done && input_done {
                let action = if diagnostics.is_empty() {
                    "Analysis complete"
                } else {
                    "Analysis complete (with errors)"
                };
                record(&mut trace, &input, &output, action);
                completed = true;
                break;
            }

            if output.is_empty() {
                if input.is_empty() {
                    break;
                }
                diagnostics.push(Diagnostic::error(
                    "S003",
                    "parse stack exhausted while input remains",
                    front_span(&input, last_span),
                ));
                record(&mut trace, &input, &output, "Error: premature end");
                if input.len() > 1 {
                    discard_input(&mut input, &mut last_span);
                    record(&mut trace, &input, &output, "Recovery: discarding token");
                    continue;
                }
                break;
            }

            if input.is_empty() {
                diagnostics.push(Diagnostic::error(
                    "S004",
                    "input exhausted while grammar symbols remain",
                    last_span,
                ));
                record(&mut trace, &input, &output, "Error: unexpected end of input");
                if output.len() > 1 {
                    output.pop();
                    shadow.pop();
                    record(&mut trace, &input, &output, "Recovery: discarding symbol");
                    continue;
                }
                break;
            }

            let Some(top) = output.last().cloned() else {
                break;
            };
            let Some(front) = input.front().map(|entry| entry.item.value.clone()) else {
                break;
            };

            match top.kind {
                StackKind::Terminal => {
                    let literal = top.value == front
                        || (is_identifier_shaped(&top.value, self.keywords)
                            && is_identifier_shaped(&front, self.keywords));
                    let by_category = !literal
                        && matches_category(&top.value, &front, self.keywords);

                    if literal || by_category {
                        output.pop();
                        let node = shadow.pop();
                        if let Some(entry) = input.pop_front() {
                            if let Some(token) = entry.token {
                                last_span = token.span();
                                if let Some(node) = node {
                                    arena.set_token(node, token);
                                }
                            }
                        }
                        let action = if by_category {
                            format!("Consumed (category): \"{front}\"")
                        } else {
                            format!("Consumed: \"{front}\"")
                        };
                        record(&mut trace, &input, &output, action);
                    } else {
                        diagnostics.push(Diagnostic::error(
                            "S001",
                            format!("expected \"{}\", found \"{}\"", top.value, front),
                            front_span(&input, last_span),
                        ));
                        record(&mut trace, &input, &output, "Error: terminal mismatch");
                        discard_input(&mut input, &mut last_span);
                        record(&mut trace, &input, &output, "Recovery: discarding token");
                    }
                }

                StackKind::NonTerminal => {
                    if !self.grammar.has_productions(&top.value) {
                        diagnostics.push(Diagnostic::error(
                            "S002",
                            format!("no productions for non-terminal \"{}\"", top.value),
                            front_span(&input, last_span),
                        ));
                        record(&mut trace, &input, &output, "Error: no production");
                        output.pop();
                        shadow.pop();
                        record(
                            &mut trace,
                            &input,
                            &output,
                            "Recovery: discarding non-terminal",
                        );
                        continue;
                    }

                    let next = input.get(1).map(|entry| entry.item.value.as_str());
                    let choice = selector
                        .select(&top.value, &front, next)
                        .unwrap_or(0);
                    let production = self.grammar.productions_for(&top.value)[choice].clone();

                    output.pop();
                    let Some(parent) = shadow.pop() else {
                        break;
                    };

                    let mut children = Vec::with_capacity(production.len());
                    for symbol in &production {
                        let (label, kind) = match symbol {
                            GrammarSymbol::Terminal(value) => (value.clone(), NodeKind::Terminal),
                            GrammarSymbol::NonTerminal(value) => {
                                (value.clone(), NodeKind::NonTerminal)
                            }
                            GrammarSymbol::Epsilon => ("ε".to_string(), NodeKind::Epsilon),
                        };
                        children.push(arena.add(label, kind));
                    }
                    arena.set_children(parent, children.clone());

                    // Push in reverse so the first symbol ends nearest the
                    // top. Epsilon children stay in the tree but never
                    // reach the stack.
                    for (symbol, child) in production.iter().zip(&children).rev() {
                        if !symbol.is_epsilon() {
                            output.push(StackItem::from_symbol(symbol));
                            shadow.push(*child);
                        }
                    }

                    let rhs = production
                        .iter()
                        .map(GrammarSymbol::value)
                        .collect::<Vec<_>>()
                        .join(" ");
                    record(
                        &mut trace,
                        &input,
                        &output,
                        format!("Expansion: {} -> {}", top.value, rhs),
                    );
                }

                StackKind::Epsilon => {
                    output.pop();
                    shadow.pop();
                    record(&mut trace, &input, &output, "Consumed: ε");
                }

                StackKind::EndMarker => {
                    // Output is done but input still holds real tokens.
                    diagnostics.push(Diagnostic::error(
                        "S003",
                        format!("expected end of input, found \"{front}\""),
                        front_span(&input, last_span),
                    ));
                    record(&mut trace, &input, &output, "Error: premature end");
                    discard_input(&mut input, &mut last_span);
                    record(&mut trace, &input, &output, "Recovery: discarding token");
                }
            }
        }

        if !completed && steps >= MAX_STEPS {
            diagnostics.push(Diagnostic::error(
                "S005",
                "iteration limit exceeded, parse aborted",
                last_span,
            ));
            record(&mut trace, &input, &output, "Error: iteration limit exceeded");
        }

        let success = completed && diagnostics.is_empty();
        debug!(
            success,
            steps,
            diagnostics = diagnostics.len(),
            "derivation finished"
        );

        ParseOutcome {
            success,
            tree: arena.build(root),
            trace,
            diagnostics,
        }
    }
}

fn record(
    trace: &mut Vec<StackSnapshot>,
    input: &VecDeque<InputEntry>,
    output: &[StackItem],
    action: impl Into<String>,
) {
    trace.push(StackSnapshot {
        step: trace.len() + 1,
        input: input.iter().map(|entry| entry.item.clone()).collect(),
        output: output.to_vec(),
        action: action.into(),
    });
}

fn front_span(input: &VecDeque<InputEntry>, last_span: Span) -> Span {
    input
        .front()
        .and_then(|entry| entry.token.as_ref())
        .map(Token::span)
        .unwrap_or(last_span)
}

fn discard_input(input: &mut VecDeque<InputEntry>, last_span: &mut Span) {
    if let Some(entry) = input.pop_front() {
        if let Some(token) = entry.token {
            *last_span = token.span();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::parser::TreeNode;

    fn identifier(value: &str, column: usize) -> Token {
        Token::new(TokenKind::Identifier, value, 1, column)
    }

    fn letters(values: &[&str]) -> Vec<Token> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| identifier(v, i + 1))
            .collect()
    }

    fn terminal_leaves(node: &TreeNode, out: &mut Vec<String>) {
        if node.children.is_empty() {
            if node.source_token.is_some() {
                out.push(node.label.clone());
            }
            return;
        }
        for child in &node.children {
            terminal_leaves(child, out);
        }
    }

    fn ab_grammar() -> Grammar {
        Grammar::parse("S -> A B\nA -> \"a\" A | \"a\"\nB -> \"b\" B | \"b\"").unwrap()
    }

    #[test]
    fn derives_aab_cleanly() {
        let grammar = ab_grammar();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&letters(&["a", "a", "b"]));

        assert!(outcome.success);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.tree.label, "S");

        let mut leaves = Vec::new();
        terminal_leaves(&outcome.tree, &mut leaves);
        assert_eq!(leaves, vec!["a", "a", "b"]);

        let last = outcome.trace.last().unwrap();
        assert_eq!(last.action, "Analysis complete");
        assert_eq!(last.input.len(), 1);
        assert!(last.input[0].is_end_marker());
        assert_eq!(last.output.len(), 1);
        assert!(last.output[0].is_end_marker());
    }

    #[test]
    fn rejects_ba() {
        let grammar = ab_grammar();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&letters(&["b", "a"]));

        assert!(!outcome.success);
        assert!(!outcome.diagnostics.is_empty());
        // failed derivations never end on a clean double end marker
        let last = outcome.trace.last().unwrap();
        let clean = last.input.len() == 1
            && last.input[0].is_end_marker()
            && last.output.len() == 1
            && last.output[0].is_end_marker();
        assert!(!clean);
    }

    #[test]
    fn trace_is_never_empty() {
        let grammar = ab_grammar();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&[]);
        assert!(!outcome.trace.is_empty());
        assert_eq!(outcome.trace[0].action, "Initialization");
        assert_eq!(outcome.trace[0].step, 1);
    }

    #[test]
    fn epsilon_expansion_closes_cleanly() {
        let grammar = Grammar::parse("S -> \"a\" T\nT -> \"b\" | ε").unwrap();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&letters(&["a"]));

        assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics);
        // the epsilon leaf is in the tree even though it never hit a stack
        let t = &outcome.tree.children[1];
        assert_eq!(t.label, "T");
        assert_eq!(t.children.len(), 1);
        assert_eq!(t.children[0].label, "ε");
    }

    #[test]
    fn missing_production_is_diagnosed_and_recovered() {
        let grammar = Grammar::parse("S -> MISSING \"a\"").unwrap();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&letters(&["a"]));

        assert!(!outcome.success);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("S002")));
    }

    #[test]
    fn terminal_mismatch_is_diagnosed() {
        let grammar = Grammar::parse("S -> \"1\" \"2\"").unwrap();
        let engine = DerivationEngine::new(&grammar);
        let tokens = vec![
            Token::new(TokenKind::Number, "9", 1, 1),
            Token::new(TokenKind::Number, "2", 1, 3),
        ];
        let outcome = engine.parse(&tokens);

        assert!(!outcome.success);
        let mismatch = outcome
            .diagnostics
            .iter()
            .find(|d| d.code.as_deref() == Some("S001"))
            .unwrap();
        assert!(mismatch.message.contains("\"1\""));
        assert_eq!(mismatch.line, 1);
        assert_eq!(mismatch.column, 1);
    }

    #[test]
    fn left_recursion_hits_the_iteration_limit() {
        let grammar = Grammar::parse("S -> S \"a\"").unwrap();
        let engine = DerivationEngine::new(&grammar);
        let outcome = engine.parse(&letters(&["a"]));

        assert!(!outcome.success);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("S005")));
        assert!(outcome.trace.len() <= MAX_STEPS + 2);
    }

    #[test]
    fn category_terminal_matches_any_identifier() {
        let grammar = Grammar::parse("S -> IDENTIFIER \"=\" NUMBER").unwrap();
        let engine = DerivationEngine::new(&grammar);
        let tokens = vec![
            Token::new(TokenKind::Identifier, "total", 1, 1),
            Token::new(TokenKind::Comparison, "=", 1, 7),
            Token::new(TokenKind::Number, "10", 1, 9),
        ];
        let outcome = engine.parse(&tokens);

        assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics);
        assert!(outcome
            .trace
            .iter()
            .any(|s| s.action.starts_with("Consumed (category)")));
        // matched terminals are relabeled to the consumed text
        let mut leaves = Vec::new();
        terminal_leaves(&outcome.tree, &mut leaves);
        assert_eq!(leaves, vec!["total", "=", "10"]);
    }

    #[test]
    fn node_ids_restart_per_parse() {
        let grammar = ab_grammar();
        let engine = DerivationEngine::new(&grammar);
        let first = engine.parse(&letters(&["a", "b"]));
        let second = engine.parse(&letters(&["a", "b"]));
        assert_eq!(first.tree.id, 0);
        assert_eq!(second.tree.id, 0);
        assert_eq!(first.tree, second.tree);
    }
}
