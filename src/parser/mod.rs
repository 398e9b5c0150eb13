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

mod engine;
mod selection;
mod stack;
mod trace;
mod tree;

pub use engine::DerivationEngine;
pub use selection::{HintKey, ProductionHint};
pub use stack::{StackItem, StackKind, END_MARKER};
pub use trace::StackSnapshot;
pub use tree::{NodeKind, TreeNode};

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Everything one derivation produces: a tree (never absent, at worst the
/// lone start-symbol node), the full snapshot trace, and the syntax
/// diagnostics. `success` is true only for a run that reached the double
/// end marker with nothing diagnosed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub success: bool,
    pub tree: TreeNode,
    pub trace: Vec<StackSnapshot>,
    pub diagnostics: Vec<Diagnostic>,
}
