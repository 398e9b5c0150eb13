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

use super::stack::StackItem;

/// One recorded state of a derivation: both stacks after an action, plus a
/// human-readable description of that action. The ordered sequence of
/// snapshots is the re-playable trace consumed by visualization
/// collaborators; it is append-only and 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSnapshot {
    pub step: usize,
    pub input: Vec<StackItem>,
    pub output: Vec<StackItem>,
    pub action: String,
}
