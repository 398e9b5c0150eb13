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

use crate::span::Span;

/// Where a symbol lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolScope {
    Global,
    Local,
    Parameter,
}

/// Whether a table entry records the introduction of a name or one use of
/// it. Both kinds live in the same flat ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    Declaration,
    Reference,
}

/// One row of the symbol table.
///
/// Declarations are created by the declaration pass and mutated in place
/// only to flip `is_used` (and to receive metrics); references are appended
/// by the reference pass. The collection is discarded at the end of each
/// analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub scope: SymbolScope,
    /// Name of the block the symbol belongs to: `global`, a function name,
    /// or a synthetic `block_<n>`.
    pub containing_block: String,
    pub line: usize,
    pub column: usize,
    pub usage: Usage,
    pub is_function: bool,
    pub is_standard_library: bool,
    pub is_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    /// Number of reference entries sharing this declaration's name. Filled
    /// by the metrics pass, declarations only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_count: Option<usize>,
    /// Cyclomatic-style score for functions: base 1, +1 per control-flow
    /// keyword in the body. Filled by the metrics pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<usize>,
}

impl Symbol {
    pub fn declaration(
        id: impl Into<String>,
        ty: impl Into<String>,
        scope: SymbolScope,
        containing_block: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            id: id.into(),
            ty: ty.into(),
            scope,
            containing_block: containing_block.into(),
            line: span.line,
            column: span.column,
            usage: Usage::Declaration,
            is_function: false,
            is_standard_library: false,
            is_used: false,
            return_type: None,
            parameters: None,
            reference_count: None,
            complexity: None,
        }
    }

    pub fn reference(
        id: impl Into<String>,
        ty: impl Into<String>,
        scope: SymbolScope,
        containing_block: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            usage: Usage::Reference,
            is_used: true,
            ..Self::declaration(id, ty, scope, containing_block, span)
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.usage == Usage::Declaration
    }
}
