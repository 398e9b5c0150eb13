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

mod scope;
mod symbol;

pub use symbol::{Symbol, SymbolScope, Usage};

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::lexer::{Token, TokenKind};
use crate::profile::{LanguageProfile, ScopeStyle};
use crate::span::Span;
use scope::{ScopeTree, GLOBAL};

const NUMERIC_TYPES: [&str; 8] = [
    "int", "float", "double", "long", "short", "unsigned", "signed", "number",
];
const TEXTUAL_TYPES: [&str; 3] = ["string", "str", "char"];
const BOOLEAN_TYPES: [&str; 2] = ["bool", "boolean"];
const CONTROL_KEYWORDS: [&str; 4] = ["if", "while", "for", "switch"];
const VARIABLE_KEYWORDS: [&str; 3] = ["var", "let", "const"];
const FUNCTION_KEYWORDS: [&str; 2] = ["function", "def"];

/// What one semantic analysis produces: the flat symbol table and the
/// semantic diagnostic channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticOutcome {
    pub symbols: Vec<Symbol>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the heuristic semantic passes over a token sequence.
///
/// Never unwinds into the caller: an internal fault is converted into a
/// single `E999` diagnostic so the overall pipeline always returns a
/// well-formed result.
pub fn analyze(tokens: &[Token], profile: &LanguageProfile) -> SemanticOutcome {
    match catch_unwind(AssertUnwindSafe(|| run_passes(tokens, profile))) {
        Ok(outcome) => outcome,
        Err(_) => SemanticOutcome {
            symbols: Vec::new(),
            diagnostics: vec![Diagnostic::error(
                "E999",
                "internal semantic analyzer fault",
                Span::synthetic(),
            )],
        },
    }
}

fn run_passes(tokens: &[Token], profile: &LanguageProfile) -> SemanticOutcome {
    let mut analysis = Analysis {
        tokens,
        profile,
        symbols: Vec::new(),
        diagnostics: Vec::new(),
        scopes: ScopeTree::new(),
        token_scope: vec![GLOBAL; tokens.len()],
    };

    analysis.collect_declarations();
    analysis.resolve_references();
    analysis.check_types();
    analysis.add_standard_library_symbols();
    analysis.compute_metrics();
    analysis.check_unused();

    debug!(
        symbols = analysis.symbols.len(),
        diagnostics = analysis.diagnostics.len(),
        "semantic analysis finished"
    );

    SemanticOutcome {
        symbols: analysis.symbols,
        diagnostics: analysis.diagnostics,
    }
}

/// Working state of one analysis call. Built fresh per call; nothing
/// survives into the next one.
struct Analysis<'a> {
    tokens: &'a [Token],
    profile: &'a LanguageProfile,
    symbols: Vec<Symbol>,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeTree,
    /// Scope id active at each token index, recorded by the declaration
    /// pass and reused by every later pass.
    token_scope: Vec<usize>,
}

impl<'a> Analysis<'a> {
    /// Declaration pass. Walks the tokens once, growing the scope tree on
    /// `{` (or `:` for indentation-scoped profiles) and recognizing the two
    /// declaration shapes: function heads and variable declarations.
    fn collect_declarations(&mut self) {
        let mut i = 0;
        while i < self.tokens.len() {
            let start = i;

            if self.is_function_declaration(i) {
                i = self.declare_function(i);
            } else if self.is_variable_declaration(i) {
                i = self.declare_variable(i);
            } else {
                let value = self.tokens[i].value.as_str();
                if value == "{"
                    || (value == ":" && self.profile.scoping == ScopeStyle::Indentation)
                {
                    self.scopes.push(format!("block_{i}"));
                } else if value == "}" {
                    self.scopes.pop();
                }
            }

            let scope = self.scopes.current();
            let end = (i + 1).min(self.tokens.len());
            for slot in &mut self.token_scope[start..end] {
                *slot = scope;
            }
            i += 1;
        }
    }

    fn is_function_declaration(&self, index: usize) -> bool {
        let token = &self.tokens[index];
        if token.kind == TokenKind::Datatype {
            return self
                .tokens
                .get(index + 1)
                .map_or(false, |t| t.kind == TokenKind::Identifier)
                && self.tokens.get(index + 2).map_or(false, |t| t.value == "(");
        }
        FUNCTION_KEYWORDS.contains(&token.value.as_str())
            && self
                .tokens
                .get(index + 1)
                .map_or(false, |t| t.kind == TokenKind::Identifier)
    }

    fn is_variable_declaration(&self, index: usize) -> bool {
        let token = &self.tokens[index];
        let head = token.kind == TokenKind::Datatype
            || VARIABLE_KEYWORDS.contains(&token.value.as_str());
        head && !self.is_function_declaration(index)
            && self
                .tokens
                .get(index + 1)
                .map_or(false, |t| t.kind == TokenKind::Identifier)
    }

    fn declare_variable(&mut self, index: usize) -> usize {
        let type_token = self.tokens[index].clone();
        let name_token = self.tokens[index + 1].clone();
        let block = self.scopes.current();

        if self.declared_in_block(&name_token.value, block) {
            self.diagnostics.push(Diagnostic::error(
                "E001",
                format!("'{}' is already declared in this block", name_token.value),
                name_token.span(),
            ));
        } else {
            let ty = if type_token.kind == TokenKind::Datatype {
                type_token.value.clone()
            } else {
                "any".to_string()
            };
            let scope = if block == GLOBAL {
                SymbolScope::Global
            } else {
                SymbolScope::Local
            };
            self.symbols.push(Symbol::declaration(
                name_token.value.clone(),
                ty,
                scope,
                self.scopes.name(block),
                name_token.span(),
            ));
        }

        // skip a trailing initializer so its tokens are not re-examined as
        // further declarations
        let mut next = index + 2;
        if self.tokens.get(next).map_or(false, |t| t.value == "=") {
            while next < self.tokens.len() && self.tokens[next].value != ";" {
                next += 1;
            }
        }
        next
    }

    /// Handles one function head. The function's named scope opens before
    /// its parameter list, so parameters and body-locals land inside it;
    /// the function symbol itself belongs to the enclosing block. Returns
    /// the index of the body-opening token.
    fn declare_function(&mut self, index: usize) -> usize {
        let head = self.tokens[index].clone();
        let name_token = self.tokens[index + 1].clone();
        let return_type = if head.kind == TokenKind::Datatype {
            head.value.clone()
        } else {
            "void".to_string()
        };

        let outer = self.scopes.current();
        let duplicate = self.declared_in_block(&name_token.value, outer);
        if duplicate {
            self.diagnostics.push(Diagnostic::error(
                "E001",
                format!("'{}' is already declared in this block", name_token.value),
                name_token.span(),
            ));
        }

        let fn_scope = self.scopes.push(name_token.value.clone());

        let mut parameters = Vec::new();
        let mut i = index + 2;
        if self.tokens.get(i).map_or(false, |t| t.value == "(") {
            i += 1;
            while i < self.tokens.len() && self.tokens[i].value != ")" {
                let typed = self.tokens[i].kind == TokenKind::Datatype
                    && self
                        .tokens
                        .get(i + 1)
                        .map_or(false, |t| t.kind == TokenKind::Identifier);
                if typed {
                    let ty = self.tokens[i].value.clone();
                    let param = self.tokens[i + 1].clone();
                    self.push_parameter(&param, ty, fn_scope, &mut parameters);
                    i += 2;
                } else if self.tokens[i].kind == TokenKind::Identifier {
                    let param = self.tokens[i].clone();
                    self.push_parameter(&param, "any".to_string(), fn_scope, &mut parameters);
                    i += 1;
                } else {
                    i += 1;
                    continue;
                }
                if self.tokens.get(i).map_or(false, |t| t.value == ",") {
                    i += 1;
                }
            }
        }

        if !duplicate {
            let scope = if outer == GLOBAL {
                SymbolScope::Global
            } else {
                SymbolScope::Local
            };
            let mut symbol = Symbol::declaration(
                name_token.value.clone(),
                "function",
                scope,
                self.scopes.name(outer),
                name_token.span(),
            );
            symbol.is_function = true;
            symbol.return_type = Some(return_type);
            symbol.parameters = Some(parameters);
            self.symbols.push(symbol);
        }

        // advance to the token that opens the body so the scope is not
        // pushed twice
        while i < self.tokens.len() {
            let value = self.tokens[i].value.as_str();
            if value == "{"
                || (value == ":" && self.profile.scoping == ScopeStyle::Indentation)
            {
                break;
            }
            i += 1;
        }
        i
    }

    fn push_parameter(
        &mut self,
        token: &Token,
        ty: String,
        fn_scope: usize,
        names: &mut Vec<String>,
    ) {
        names.push(token.value.clone());
        let mut symbol = Symbol::declaration(
            token.value.clone(),
            ty,
            SymbolScope::Parameter,
            self.scopes.name(fn_scope),
            token.span(),
        );
        // parameters are exempt from the unused check
        symbol.is_used = true;
        self.symbols.push(symbol);
    }

    fn declared_in_block(&self, name: &str, block: usize) -> bool {
        let block_name = self.scopes.name(block);
        self.symbols
            .iter()
            .any(|s| s.is_declaration() && s.id == name && s.containing_block == block_name)
    }

    /// Reference pass. Every identifier not itself part of a declaration
    /// resolves against the scope recorded for its position, walking the
    /// chain innermost out and falling back to global.
    fn resolve_references(&mut self) {
        for i in 0..self.tokens.len() {
            let token = self.tokens[i].clone();
            if token.kind != TokenKind::Identifier || self.is_part_of_declaration(i) {
                continue;
            }

            let is_call = self.tokens.get(i + 1).map_or(false, |t| t.value == "(");
            let scope = self.token_scope.get(i).copied().unwrap_or(GLOBAL);

            match self.find_declaration(&token.value, scope) {
                Some(index) => {
                    self.symbols[index].is_used = true;
                    let ty = self.symbols[index].ty.clone();
                    let is_function = self.symbols[index].is_function;

                    let kind = if scope == GLOBAL {
                        SymbolScope::Global
                    } else {
                        SymbolScope::Local
                    };
                    let block_name = self.scopes.name(scope).to_string();
                    self.symbols.push(Symbol::reference(
                        token.value.clone(),
                        ty,
                        kind,
                        block_name,
                        token.span(),
                    ));

                    if is_function && !is_call && !self.inside_function_signature(i) {
                        self.diagnostics.push(Diagnostic::warning(
                            "W003",
                            format!("'{}' is a function but is used as a variable", token.value),
                            token.span(),
                        ));
                    }
                    if !is_function && is_call {
                        self.diagnostics.push(Diagnostic::error(
                            "E003",
                            format!("'{}' is a variable but is called as a function", token.value),
                            token.span(),
                        ));
                    }
                }
                None => {
                    let profile = self.profile;
                    if !profile.standard_library.iter().any(|s| s == &token.value) {
                        self.diagnostics.push(Diagnostic::error(
                            "E002",
                            format!("'{}' is not declared", token.value),
                            token.span(),
                        ));
                    }
                }
            }
        }
    }

    fn is_part_of_declaration(&self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        let previous = &self.tokens[index - 1];
        previous.kind == TokenKind::Datatype
            || VARIABLE_KEYWORDS.contains(&previous.value.as_str())
            || FUNCTION_KEYWORDS.contains(&previous.value.as_str())
    }

    fn inside_function_signature(&self, index: usize) -> bool {
        let lower = index.saturating_sub(5);
        let has_head = (lower..index).any(|j| {
            let token = &self.tokens[j];
            token.kind == TokenKind::Datatype
                || FUNCTION_KEYWORDS.contains(&token.value.as_str())
        });
        if !has_head {
            return false;
        }
        (index + 1..index + 4).any(|j| self.tokens.get(j).map_or(false, |t| t.value == "("))
    }

    fn find_declaration(&self, name: &str, scope: usize) -> Option<usize> {
        let chain: Vec<usize> = self.scopes.chain(scope).collect();
        for block in chain {
            let block_name = self.scopes.name(block);
            let found = self.symbols.iter().position(|s| {
                s.is_declaration() && s.id == name && s.containing_block == block_name
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Type pass. For assignments outside declarations, infers the coarse
    /// type of the right-hand side and compares it to the declared type
    /// through the family table. Unknown and `any` types are skipped.
    fn check_types(&mut self) {
        if self.tokens.len() < 3 {
            return;
        }
        for i in 0..self.tokens.len() - 2 {
            if self.tokens[i].kind != TokenKind::Identifier
                || self.tokens[i + 1].value != "="
                || self.is_part_of_declaration(i)
            {
                continue;
            }
            let token = self.tokens[i].clone();
            let scope = self.token_scope.get(i).copied().unwrap_or(GLOBAL);
            let Some(index) = self.find_declaration(&token.value, scope) else {
                continue;
            };
            let declared = self.symbols[index].ty.clone();
            if declared == "any" || declared == "function" {
                continue;
            }
            let Some(inferred) = self.infer_type(i + 2, scope) else {
                continue;
            };
            if inferred == "any" {
                continue;
            }
            if !types_compatible(&declared, &inferred) {
                self.diagnostics.push(Diagnostic::warning(
                    "W001",
                    format!("type mismatch: assigning '{inferred}' to '{declared}'"),
                    token.span(),
                ));
            }
        }
    }

    fn infer_type(&self, index: usize, scope: usize) -> Option<String> {
        let token = self.tokens.get(index)?;
        if matches!(token.value.as_str(), "true" | "false" | "True" | "False") {
            return Some("bool".to_string());
        }
        match token.kind {
            TokenKind::Number => Some("int".to_string()),
            TokenKind::String => Some("string".to_string()),
            TokenKind::Identifier => self
                .find_declaration(&token.value, scope)
                .map(|i| self.symbols[i].ty.clone()),
            _ => None,
        }
    }

    /// Standard-library names that actually occur in the source get a
    /// synthesized, already-used declaration-and-reference pair so they
    /// show up in the table without ever tripping the undeclared check.
    fn add_standard_library_symbols(&mut self) {
        let profile = self.profile;
        let tokens = self.tokens;
        for name in &profile.standard_library {
            if !tokens.iter().any(|t| &t.value == name) {
                continue;
            }
            let mut declaration = Symbol::declaration(
                name.clone(),
                "function",
                SymbolScope::Global,
                "global",
                Span::synthetic(),
            );
            declaration.is_function = true;
            declaration.is_standard_library = true;
            declaration.is_used = true;
            self.symbols.push(declaration);

            let mut reference = Symbol::reference(
                name.clone(),
                "function",
                SymbolScope::Global,
                "global",
                Span::synthetic(),
            );
            reference.is_function = true;
            reference.is_standard_library = true;
            self.symbols.push(reference);
        }
    }

    fn compute_metrics(&mut self) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for symbol in &self.symbols {
            if symbol.usage == Usage::Reference {
                *counts.entry(symbol.id.clone()).or_insert(0) += 1;
            }
        }

        let tokens = self.tokens;
        for symbol in &mut self.symbols {
            if !symbol.is_declaration() {
                continue;
            }
            symbol.reference_count = Some(counts.get(&symbol.id).copied().unwrap_or(0));
            if symbol.is_function && !symbol.is_standard_library {
                symbol.complexity = Some(function_complexity(tokens, &symbol.id));
            }
        }
    }

    fn check_unused(&mut self) {
        let mut warnings = Vec::new();
        for symbol in &self.symbols {
            if symbol.is_declaration()
                && !symbol.is_used
                && !symbol.is_function
                && symbol.scope != SymbolScope::Parameter
            {
                warnings.push(Diagnostic::warning(
                    "W002",
                    format!("'{}' is declared but never used", symbol.id),
                    Span::new(symbol.line, symbol.column),
                ));
            }
        }
        self.diagnostics.extend(warnings);
    }
}

fn types_compatible(declared: &str, value: &str) -> bool {
    declared == value
        || (NUMERIC_TYPES.contains(&declared) && NUMERIC_TYPES.contains(&value))
        || (TEXTUAL_TYPES.contains(&declared) && TEXTUAL_TYPES.contains(&value))
        || (BOOLEAN_TYPES.contains(&declared) && BOOLEAN_TYPES.contains(&value))
}

/// Base 1, +1 per control-flow keyword between the first occurrence of the
/// function's name and the close of its brace span. For block-less bodies
/// the scan runs to end of input.
fn function_complexity(tokens: &[Token], name: &str) -> usize {
    let mut complexity = 1;
    let mut inside = false;
    let mut depth = 0usize;

    for token in tokens {
        if !inside {
            if token.kind == TokenKind::Identifier && token.value == name {
                inside = true;
            }
            continue;
        }
        match token.value.as_str() {
            "{" => depth += 1,
            "}" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            value if CONTROL_KEYWORDS.contains(&value) => complexity += 1,
            _ => {}
        }
    }
    complexity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::profile::profile_by_id;

    fn analyze_c(source: &str) -> SemanticOutcome {
        let profile = profile_by_id("c").unwrap();
        let tokens = tokenize(source, &profile.keywords, &profile.datatypes);
        analyze(&tokens, &profile)
    }

    fn codes(outcome: &SemanticOutcome, code: &str) -> usize {
        outcome
            .diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(code))
            .count()
    }

    #[test]
    fn unused_variable_warns_once() {
        let outcome = analyze_c("int x;");
        assert_eq!(codes(&outcome, "W002"), 1);
        let warning = outcome
            .diagnostics
            .iter()
            .find(|d| d.code.as_deref() == Some("W002"))
            .unwrap();
        assert!(warning.message.contains("'x'"));
        assert_eq!(warning.line, 1);
        assert!(warning.is_warning());
    }

    #[test]
    fn undeclared_reference_errors_once() {
        let outcome = analyze_c("int x; y = 1;");
        assert_eq!(codes(&outcome, "E002"), 1);
        let error = outcome
            .diagnostics
            .iter()
            .find(|d| d.code.as_deref() == Some("E002"))
            .unwrap();
        assert!(error.message.contains("'y'"));
    }

    #[test]
    fn duplicate_declaration_in_same_block() {
        let outcome = analyze_c("int x; int x;");
        assert_eq!(codes(&outcome, "E001"), 1);
        // the duplicate is not added twice
        let declarations = outcome
            .symbols
            .iter()
            .filter(|s| s.is_declaration() && s.id == "x")
            .count();
        assert_eq!(declarations, 1);
    }

    #[test]
    fn shadowing_in_inner_scope_is_allowed() {
        let outcome = analyze_c("int x; int f() { int x; x = 1; }");
        assert_eq!(codes(&outcome, "E001"), 0);
        // the inner x absorbs the reference, the outer one stays unused
        assert_eq!(codes(&outcome, "W002"), 1);
    }

    #[test]
    fn factorial_example_is_semantically_clean() {
        let profile = profile_by_id("c").unwrap();
        let tokens = tokenize(&profile.example, &profile.keywords, &profile.datatypes);
        let outcome = analyze(&tokens, &profile);

        assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);

        let factorial = outcome
            .symbols
            .iter()
            .find(|s| s.is_declaration() && s.id == "factorial")
            .unwrap();
        assert!(factorial.is_function);
        assert_eq!(factorial.return_type.as_deref(), Some("int"));
        assert_eq!(factorial.parameters.as_deref(), Some(&["n".to_string()][..]));
        assert_eq!(factorial.complexity, Some(2));
        assert_eq!(factorial.reference_count, Some(2));

        let n = outcome
            .symbols
            .iter()
            .find(|s| s.is_declaration() && s.id == "n")
            .unwrap();
        assert_eq!(n.scope, SymbolScope::Parameter);
        assert_eq!(n.containing_block, "factorial");
        assert!(n.is_used);
    }

    #[test]
    fn standard_library_names_never_undeclared() {
        let outcome = analyze_c("int main() { printf(\"hi\"); return 0; }");
        assert_eq!(codes(&outcome, "E002"), 0);

        let stdlib: Vec<_> = outcome
            .symbols
            .iter()
            .filter(|s| s.is_standard_library && s.id == "printf")
            .collect();
        assert_eq!(stdlib.len(), 2);
        assert!(stdlib.iter().any(|s| s.usage == Usage::Declaration));
        assert!(stdlib.iter().any(|s| s.usage == Usage::Reference));
        assert!(stdlib.iter().all(|s| s.is_used));
    }

    #[test]
    fn assignment_type_mismatch_warns() {
        let outcome = analyze_c("int x; x = \"hi\";");
        assert_eq!(codes(&outcome, "W001"), 1);
        let warning = outcome
            .diagnostics
            .iter()
            .find(|d| d.code.as_deref() == Some("W001"))
            .unwrap();
        assert!(warning.message.contains("string"));
        assert!(warning.message.contains("int"));
    }

    #[test]
    fn numeric_family_is_compatible() {
        let outcome = analyze_c("float x; int y = 1; x = y;");
        assert_eq!(codes(&outcome, "W001"), 0);
    }

    #[test]
    fn variable_called_as_function_errors() {
        let outcome = analyze_c("int x; x();");
        assert_eq!(codes(&outcome, "E003"), 1);
    }

    #[test]
    fn function_used_as_variable_warns() {
        let outcome = analyze_c("int f() { return 1; } int y = f; y = y;");
        assert_eq!(codes(&outcome, "W003"), 1);
    }

    #[test]
    fn javascript_parameters_without_types() {
        let profile = profile_by_id("javascript").unwrap();
        let tokens = tokenize(
            "function add(a, b) { return a + b; }",
            &profile.keywords,
            &profile.datatypes,
        );
        let outcome = analyze(&tokens, &profile);

        assert_eq!(codes(&outcome, "E002"), 0);
        let params: Vec<_> = outcome
            .symbols
            .iter()
            .filter(|s| s.is_declaration() && s.scope == SymbolScope::Parameter)
            .collect();
        assert_eq!(params.len(), 2);
        assert!(params.iter().all(|p| p.ty == "any" && p.containing_block == "add"));
    }

    #[test]
    fn python_colon_opens_scopes() {
        let profile = profile_by_id("python").unwrap();
        let tokens = tokenize(
            "def twice(n):\n    return n * 2\n",
            &profile.keywords,
            &profile.datatypes,
        );
        let outcome = analyze(&tokens, &profile);

        assert_eq!(codes(&outcome, "E002"), 0, "{:?}", outcome.diagnostics);
        let twice = outcome
            .symbols
            .iter()
            .find(|s| s.is_declaration() && s.id == "twice")
            .unwrap();
        assert!(twice.is_function);
        assert_eq!(twice.containing_block, "global");
    }
}
