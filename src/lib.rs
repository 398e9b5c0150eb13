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

//! Grammar-driven analysis pipeline for teaching compiler front ends.
//!
//! Takes a context-free grammar in a simplified BNF notation plus a source
//! snippet in one of a few toy languages, and produces a token stream, a
//! derivation tree, a step-by-step trace of a stack-based top-down parse,
//! and a symbol table with semantic diagnostics.
//!
//! The pipeline is synchronous and stateless across calls: each analysis is
//! a pure function of (grammar, language profile, source text). Every
//! diagnosed condition past grammar loading recovers locally, so a call
//! always comes back with a well-formed, serializable [`AnalysisResult`].
//!
//! ```
//! use parselab::{bundled_profiles, AnalyzerEngine};
//!
//! let profile = bundled_profiles()
//!     .into_iter()
//!     .find(|p| p.id == "c")
//!     .unwrap();
//!
//! let mut engine = AnalyzerEngine::new();
//! engine.set_language_profile(profile).unwrap();
//!
//! let result = engine.analyze("int x = 1;").unwrap();
//! assert!(result.statistics.token_count > 0);
//! assert!(result.tree.depth() >= 1);
//! ```

pub mod analyzer;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod profile;
pub mod semantics;
pub mod span;

pub use analyzer::{AnalysisResult, AnalyzerEngine, Statistics};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{AnalyzeError, GrammarError};
pub use grammar::{Grammar, GrammarData, GrammarSymbol, Production, ProductionRule};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{
    DerivationEngine, HintKey, NodeKind, ParseOutcome, ProductionHint, StackItem, StackKind,
    StackSnapshot, TreeNode,
};
pub use profile::{bundled_profiles, profile_by_id, LanguageProfile, ScopeStyle};
pub use semantics::{SemanticOutcome, Symbol, SymbolScope, Usage};
pub use span::Span;
