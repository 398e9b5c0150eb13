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

/// How bad a diagnostic is. Only `Error` affects the `success` flag of an
/// analysis; warnings and infos are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One entry in either diagnostic channel (syntax or semantic).
///
/// Diagnostics are data, not Rust errors: the pipeline recovers locally from
/// every diagnosed condition and keeps producing a best-effort result, so
/// these records only ever travel inside an `AnalysisResult`.
///
/// Stable codes:
/// - `S001`..`S005` — derivation engine (mismatch, no production, premature
///   end, unexpected end of input, iteration limit)
/// - `E001`..`E003`, `W001`..`W003`, `E999` — semantic analyzer
/// - `E000` — coordinator (source produced no tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            severity,
            line: span.line,
            column: span.column,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}
