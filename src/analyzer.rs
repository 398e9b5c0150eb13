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
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::{AnalyzeError, GrammarError};
use crate::grammar::{Grammar, GrammarData};
use crate::lexer::{self, Token};
use crate::parser::{DerivationEngine, ParseOutcome, StackSnapshot, TreeNode};
use crate::profile::LanguageProfile;
use crate::semantics::{self, Symbol, Usage};
use crate::span::Span;

/// Summary numbers over one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub token_count: usize,
    pub declared_symbol_count: usize,
    /// Error-severity diagnostics across both channels.
    pub error_count: usize,
    /// Warning-severity diagnostics across both channels.
    pub warning_count: usize,
    /// Longest root-to-leaf path of the derivation tree, minimum 1.
    pub tree_depth: usize,
}

/// The flat record one analysis returns. This is the sole contract
/// consumed by front ends, exporters and report generators; none of them
/// reach into parser or analyzer internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// True only when the derivation ran clean and no semantic errors were
    /// recorded. Derived from the diagnostics, never an exception signal.
    pub success: bool,
    pub tokens: Vec<Token>,
    pub tree: TreeNode,
    pub symbols: Vec<Symbol>,
    pub syntax_diagnostics: Vec<Diagnostic>,
    pub semantic_diagnostics: Vec<Diagnostic>,
    pub trace: Vec<StackSnapshot>,
    pub statistics: Statistics,
}

/// The coordinating entry point of the pipeline.
///
/// Holds the loaded grammar and the active language profile, runs
/// tokenize -> derivation -> semantic analysis per call, and normalizes
/// edge cases into well-formed results. Each `analyze` call builds its
/// own component state, so instances can be reused across analyses
/// without leakage.
#[derive(Debug, Default)]
pub struct AnalyzerEngine {
    grammar: Option<Grammar>,
    profile: Option<LanguageProfile>,
}

impl AnalyzerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a grammar from text, replacing any previous one.
    pub fn set_grammar(&mut self, grammar_text: &str) -> Result<(), GrammarError> {
        self.grammar = Some(Grammar::parse(grammar_text)?);
        Ok(())
    }

    /// Activates a language profile and loads its bundled grammar. A later
    /// `set_grammar` call can still swap the grammar out.
    pub fn set_language_profile(&mut self, profile: LanguageProfile) -> Result<(), GrammarError> {
        self.set_grammar(&profile.grammar)?;
        self.profile = Some(profile);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.grammar.is_some()
    }

    /// Flattened view of the loaded grammar, if any.
    pub fn grammar_info(&self) -> Option<GrammarData> {
        self.grammar.as_ref().map(Grammar::summary)
    }

    /// Runs the full pipeline over `source_text`.
    ///
    /// Fails only when no grammar is loaded or the source is blank; every
    /// other condition is folded into the returned record's diagnostic
    /// channels.
    pub fn analyze(&self, source_text: &str) -> Result<AnalysisResult, AnalyzeError> {
        let grammar = self.grammar.as_ref().ok_or(AnalyzeError::EmptyGrammar)?;
        if source_text.trim().is_empty() {
            return Err(AnalyzeError::EmptySource);
        }

        let fallback;
        let profile = match &self.profile {
            Some(profile) => profile,
            None => {
                fallback = LanguageProfile::custom("custom");
                &fallback
            }
        };

        let tokens = lexer::tokenize(source_text, &profile.keywords, &profile.datatypes);
        let engine = DerivationEngine::with_profile(grammar, &profile.keywords, &profile.hints);

        if tokens.is_empty() {
            // comments-only source: keep the contract shape instead of
            // failing the call
            let parse = engine.parse(&tokens);
            let semantic_diagnostics = vec![Diagnostic::error(
                "E000",
                "no tokens found in source",
                Span::start(),
            )];
            let statistics = compute_statistics(&tokens, &[], &parse, &semantic_diagnostics);
            return Ok(AnalysisResult {
                success: false,
                tokens,
                symbols: Vec::new(),
                syntax_diagnostics: parse.diagnostics.clone(),
                semantic_diagnostics,
                statistics,
                tree: parse.tree,
                trace: parse.trace,
            });
        }

        let parse = engine.parse(&tokens);
        let semantic = semantics::analyze(&tokens, profile);

        let statistics =
            compute_statistics(&tokens, &semantic.symbols, &parse, &semantic.diagnostics);
        let success = parse.success && !semantic.diagnostics.iter().any(Diagnostic::is_error);
        debug!(success, tokens = tokens.len(), "analysis finished");

        Ok(AnalysisResult {
            success,
            tokens,
            symbols: semantic.symbols,
            syntax_diagnostics: parse.diagnostics.clone(),
            semantic_diagnostics: semantic.diagnostics,
            statistics,
            tree: parse.tree,
            trace: parse.trace,
        })
    }
}

fn compute_statistics(
    tokens: &[Token],
    symbols: &[Symbol],
    parse: &ParseOutcome,
    semantic_diagnostics: &[Diagnostic],
) -> Statistics {
    let errors = parse
        .diagnostics
        .iter()
        .chain(semantic_diagnostics)
        .filter(|d| d.is_error())
        .count();
    let warnings = parse
        .diagnostics
        .iter()
        .chain(semantic_diagnostics)
        .filter(|d| d.is_warning())
        .count();

    Statistics {
        token_count: tokens.len(),
        declared_symbol_count: symbols
            .iter()
            .filter(|s| s.usage == Usage::Declaration)
            .count(),
        error_count: errors,
        warning_count: warnings,
        tree_depth: parse.tree.depth(),
    }
}
