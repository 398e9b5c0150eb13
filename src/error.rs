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

use thiserror::Error;

/// Hard failures while loading a grammar. Everything past loading recovers
/// locally and reports through the diagnostic channels instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A rule line did not contain exactly one `->` with a non-empty
    /// left-hand side.
    #[error("malformed grammar rule on line {line}: `{text}`")]
    MalformedLine { line: usize, text: String },

    /// The grammar text contained no rule lines at all.
    #[error("grammar defines no rules, start symbol cannot be determined")]
    NoStartSymbol,
}

/// Hard failures of the `analyze` entry point. These are the only
/// conditions the coordinator refuses to analyze; anything else becomes a
/// best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    #[error("no grammar has been loaded")]
    EmptyGrammar,

    #[error("source text is empty")]
    EmptySource,
}
