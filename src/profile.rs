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

use crate::parser::ProductionHint;

/// How the toy language opens nested blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeStyle {
    /// `{` opens, `}` closes.
    Braces,
    /// `:` opens; there is no closing token.
    Indentation,
}

/// Everything that parameterizes the pipeline for one toy language:
/// vocabularies for the tokenizer, a bundled grammar and example snippet,
/// standard-library names for the semantic analyzer, and the
/// named-production overrides for the derivation engine.
///
/// Profiles are plain data handed to the coordinator per analysis; there is
/// no global registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub datatypes: Vec<String>,
    pub standard_library: Vec<String>,
    pub grammar: String,
    pub example: String,
    pub scoping: ScopeStyle,
    pub hints: Vec<ProductionHint>,
}

impl LanguageProfile {
    /// A profile with empty vocabularies, for analyses driven purely by a
    /// user-supplied grammar.
    pub fn custom(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            keywords: Vec::new(),
            datatypes: Vec::new(),
            standard_library: Vec::new(),
            grammar: String::new(),
            example: String::new(),
            scoping: ScopeStyle::Braces,
            hints: Vec::new(),
        }
    }
}

/// The three bundled toy languages: a C-like typed language, a
/// brace-scoped dynamic one and an indentation-scoped dynamic one.
pub fn bundled_profiles() -> Vec<LanguageProfile> {
    vec![c_profile(), javascript_profile(), python_profile()]
}

pub fn profile_by_id(id: &str) -> Option<LanguageProfile> {
    bundled_profiles().into_iter().find(|p| p.id == id)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn c_profile() -> LanguageProfile {
    LanguageProfile {
        id: "c".to_string(),
        name: "C".to_string(),
        description: "A general-purpose, low-level programming language".to_string(),
        keywords: strings(&[
            "if", "else", "for", "while", "do", "switch", "case", "default", "break",
            "continue", "return", "goto", "typedef", "struct", "enum", "union", "sizeof",
        ]),
        datatypes: strings(&[
            "int", "float", "double", "char", "void", "long", "short", "unsigned", "signed",
        ]),
        standard_library: strings(&["printf", "scanf", "malloc", "free", "strlen", "strcpy"]),
        grammar: r#"PROGRAM -> DECLARATIONS
DECLARATIONS -> DECLARATION DECLARATIONS | DECLARATION | ε
DECLARATION -> FUNCTION_DECLARATION | VARIABLE_DECLARATION
FUNCTION_DECLARATION -> TYPE IDENTIFIER "(" PARAMETER_LIST ")" "{" STATEMENTS "}"
PARAMETER_LIST -> PARAMETER "," PARAMETER_LIST | PARAMETER | ε
PARAMETER -> TYPE IDENTIFIER
VARIABLE_DECLARATION -> TYPE IDENTIFIER ";" | TYPE IDENTIFIER "=" EXPRESSION ";"
TYPE -> "int" | "float" | "double" | "char" | "void" | "long" | "short" | "unsigned" | "signed"
STATEMENTS -> STATEMENT STATEMENTS | STATEMENT | ε
STATEMENT -> VARIABLE_DECLARATION | IF_STATEMENT | WHILE_STATEMENT | FOR_STATEMENT | RETURN_STATEMENT | EXPRESSION_STATEMENT
IF_STATEMENT -> "if" "(" EXPRESSION ")" "{" STATEMENTS "}" ELSE_PART
ELSE_PART -> "else" "{" STATEMENTS "}" | ε
WHILE_STATEMENT -> "while" "(" EXPRESSION ")" "{" STATEMENTS "}"
FOR_STATEMENT -> "for" "(" EXPRESSION ";" EXPRESSION ";" EXPRESSION ")" "{" STATEMENTS "}"
RETURN_STATEMENT -> "return" EXPRESSION ";" | "return" ";"
EXPRESSION_STATEMENT -> EXPRESSION ";"
EXPRESSION -> TERM | TERM "+" EXPRESSION | TERM "-" EXPRESSION | TERM "<=" EXPRESSION | TERM ">=" EXPRESSION | TERM "==" EXPRESSION | TERM "!=" EXPRESSION | TERM "<" EXPRESSION | TERM ">" EXPRESSION
TERM -> FACTOR | FACTOR "*" TERM | FACTOR "/" TERM
FACTOR -> NUMBER | CHARACTER | IDENTIFIER | FUNCTION_CALL | "(" EXPRESSION ")"
FUNCTION_CALL -> IDENTIFIER "(" ARGUMENT_LIST ")"
ARGUMENT_LIST -> EXPRESSION "," ARGUMENT_LIST | EXPRESSION | ε
CHARACTER -> "'" LETTER "'"
IDENTIFIER -> LETTER ALPHANUMERIC
ALPHANUMERIC -> LETTER ALPHANUMERIC | DIGIT ALPHANUMERIC | ε
LETTER -> "a" | "b" | "c" | ... | "z" | "A" | "B" | "C" | ... | "Z" | "_"
DIGIT -> "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9""#
            .to_string(),
        example: r#"int factorial(int n) {
    if (n <= 1) {
        return 1;
    }
    return n * factorial(n - 1);
}

int main() {
    int result = factorial(5);
    printf("%d", result);
    return 0;
}"#
        .to_string(),
        scoping: ScopeStyle::Braces,
        hints: Vec::new(),
    }
}

fn javascript_profile() -> LanguageProfile {
    LanguageProfile {
        id: "javascript".to_string(),
        name: "JavaScript".to_string(),
        description: "A high-level, interpreted programming language".to_string(),
        keywords: strings(&[
            "if", "else", "for", "while", "function", "return", "var", "let", "const",
            "break", "continue", "switch", "case", "default", "try", "catch", "finally",
        ]),
        datatypes: strings(&[
            "number", "string", "boolean", "object", "array", "null", "undefined",
        ]),
        standard_library: strings(&["console", "Math", "parseInt", "parseFloat"]),
        grammar: r#"PROGRAM -> STATEMENTS
STATEMENTS -> STATEMENT STATEMENTS | STATEMENT | ε
STATEMENT -> VARIABLE_DECLARATION | FUNCTION_DECLARATION | IF_STATEMENT | WHILE_STATEMENT | FOR_STATEMENT | RETURN_STATEMENT | EXPRESSION_STATEMENT
VARIABLE_DECLARATION -> VAR_KEYWORD IDENTIFIER "=" EXPRESSION ";" | VAR_KEYWORD IDENTIFIER ";"
VAR_KEYWORD -> "var" | "let" | "const"
FUNCTION_DECLARATION -> "function" IDENTIFIER "(" PARAMETER_LIST ")" "{" STATEMENTS "}"
PARAMETER_LIST -> IDENTIFIER "," PARAMETER_LIST | IDENTIFIER | ε
IF_STATEMENT -> "if" "(" EXPRESSION ")" "{" STATEMENTS "}" ELSE_PART
ELSE_PART -> "else" "{" STATEMENTS "}" | ε
WHILE_STATEMENT -> "while" "(" EXPRESSION ")" "{" STATEMENTS "}"
FOR_STATEMENT -> "for" "(" VARIABLE_DECLARATION EXPRESSION ";" EXPRESSION ")" "{" STATEMENTS "}"
RETURN_STATEMENT -> "return" EXPRESSION ";" | "return" ";"
EXPRESSION_STATEMENT -> EXPRESSION ";"
EXPRESSION -> TERM | TERM "+" EXPRESSION | TERM "-" EXPRESSION | TERM "<=" EXPRESSION | TERM ">=" EXPRESSION | TERM "==" EXPRESSION | TERM "!=" EXPRESSION | TERM "<" EXPRESSION | TERM ">" EXPRESSION
TERM -> FACTOR | FACTOR "*" TERM | FACTOR "/" TERM
FACTOR -> NUMBER | STRING | BOOLEAN | IDENTIFIER | FUNCTION_CALL | "(" EXPRESSION ")"
FUNCTION_CALL -> IDENTIFIER "(" ARGUMENT_LIST ")"
ARGUMENT_LIST -> EXPRESSION "," ARGUMENT_LIST | EXPRESSION | ε
BOOLEAN -> "true" | "false"
IDENTIFIER -> LETTER ALPHANUMERIC
ALPHANUMERIC -> LETTER ALPHANUMERIC | DIGIT ALPHANUMERIC | ε
LETTER -> "a" | "b" | "c" | ... | "z" | "A" | "B" | "C" | ... | "Z" | "_"
DIGIT -> "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9""#
            .to_string(),
        example: r#"function factorial(n) {
  if (n <= 1) {
    return 1;
  }
  return n * factorial(n - 1);
}

var result = factorial(5);
console.log(result);"#
            .to_string(),
        scoping: ScopeStyle::Braces,
        hints: vec![
            ProductionHint::keyword("STATEMENT", "var", &["VARIABLE_DECLARATION"]),
            ProductionHint::keyword("STATEMENT", "let", &["VARIABLE_DECLARATION"]),
            ProductionHint::keyword("STATEMENT", "const", &["VARIABLE_DECLARATION"]),
            ProductionHint::keyword("STATEMENT", "function", &["FUNCTION_DECLARATION"]),
            ProductionHint::keyword("STATEMENT", "if", &["IF_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "for", &["FOR_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "while", &["WHILE_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "return", &["RETURN_STATEMENT"]),
            ProductionHint::identifier("STATEMENT", &["EXPRESSION_STATEMENT"]),
        ],
    }
}

fn python_profile() -> LanguageProfile {
    LanguageProfile {
        id: "python".to_string(),
        name: "Python".to_string(),
        description: "A high-level, interpreted language with simple syntax".to_string(),
        keywords: strings(&[
            "if", "elif", "else", "for", "while", "def", "return", "class", "import",
            "from", "as", "try", "except", "finally", "with", "pass", "break", "continue",
            "print",
        ]),
        datatypes: strings(&[
            "int", "float", "str", "bool", "list", "tuple", "dict", "set", "None",
        ]),
        standard_library: strings(&["print", "len", "range", "input", "int", "str"]),
        grammar: r#"PROGRAM -> STATEMENTS
STATEMENTS -> STATEMENT STATEMENTS | STATEMENT | ε
STATEMENT -> VARIABLE_ASSIGNMENT | FUNCTION_DEFINITION | IF_STATEMENT | WHILE_STATEMENT | FOR_STATEMENT | RETURN_STATEMENT | EXPRESSION_STATEMENT | PRINT_STATEMENT
VARIABLE_ASSIGNMENT -> IDENTIFIER "=" EXPRESSION
FUNCTION_DEFINITION -> "def" IDENTIFIER "(" PARAMETER_LIST ")" ":" STATEMENTS
PARAMETER_LIST -> IDENTIFIER "," PARAMETER_LIST | IDENTIFIER | ε
IF_STATEMENT -> "if" EXPRESSION ":" STATEMENTS ELIF_PARTS ELSE_PART
ELIF_PARTS -> ELIF_PART ELIF_PARTS | ε
ELIF_PART -> "elif" EXPRESSION ":" STATEMENTS
ELSE_PART -> "else" ":" STATEMENTS | ε
WHILE_STATEMENT -> "while" EXPRESSION ":" STATEMENTS
FOR_STATEMENT -> "for" IDENTIFIER "in" EXPRESSION ":" STATEMENTS
RETURN_STATEMENT -> "return" EXPRESSION | "return"
EXPRESSION_STATEMENT -> EXPRESSION
PRINT_STATEMENT -> "print" "(" EXPRESSION ")"
EXPRESSION -> TERM | TERM "+" EXPRESSION | TERM "-" EXPRESSION | TERM "<=" EXPRESSION | TERM ">=" EXPRESSION | TERM "==" EXPRESSION | TERM "!=" EXPRESSION | TERM "<" EXPRESSION | TERM ">" EXPRESSION
TERM -> FACTOR | FACTOR "*" TERM | FACTOR "/" TERM
FACTOR -> NUMBER | STRING | BOOLEAN | IDENTIFIER | FUNCTION_CALL | "(" EXPRESSION ")" | LIST | DICT
FUNCTION_CALL -> IDENTIFIER "(" ARGUMENT_LIST ")"
ARGUMENT_LIST -> EXPRESSION "," ARGUMENT_LIST | EXPRESSION | ε
LIST -> "[" LIST_ITEMS "]"
LIST_ITEMS -> EXPRESSION "," LIST_ITEMS | EXPRESSION | ε
DICT -> "{" DICT_ITEMS "}"
DICT_ITEMS -> EXPRESSION ":" EXPRESSION "," DICT_ITEMS | EXPRESSION ":" EXPRESSION | ε
BOOLEAN -> "True" | "False"
IDENTIFIER -> LETTER ALPHANUMERIC
ALPHANUMERIC -> LETTER ALPHANUMERIC | DIGIT ALPHANUMERIC | ε
LETTER -> "a" | "b" | "c" | ... | "z" | "A" | "B" | "C" | ... | "Z" | "_"
DIGIT -> "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9""#
            .to_string(),
        example: r#"def factorial(n):
    if n <= 1:
        return 1
    return n * factorial(n - 1)

result = factorial(5)
print(result)"#
            .to_string(),
        scoping: ScopeStyle::Indentation,
        hints: vec![
            ProductionHint::keyword("STATEMENT", "if", &["IF_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "for", &["FOR_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "while", &["WHILE_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "def", &["FUNCTION_DEFINITION"]),
            ProductionHint::keyword("STATEMENT", "return", &["RETURN_STATEMENT"]),
            ProductionHint::keyword("STATEMENT", "print", &["PRINT_STATEMENT"]),
            ProductionHint::identifier(
                "STATEMENT",
                &["VARIABLE_ASSIGNMENT", "EXPRESSION_STATEMENT"],
            ),
            ProductionHint::operand("EXPRESSION", &["TERM"]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn three_profiles_are_bundled() {
        let profiles = bundled_profiles();
        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "javascript", "python"]);
    }

    #[test]
    fn bundled_grammars_load() {
        for profile in bundled_profiles() {
            let grammar = Grammar::parse(&profile.grammar)
                .unwrap_or_else(|e| panic!("grammar for {} failed: {e}", profile.id));
            assert_eq!(grammar.start_symbol(), "PROGRAM");
            assert!(grammar.rule_count() > 10);
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(profile_by_id("python").is_some());
        assert!(profile_by_id("cobol").is_none());
    }

    #[test]
    fn custom_profile_is_empty() {
        let profile = LanguageProfile::custom("mini");
        assert_eq!(profile.id, "mini");
        assert!(profile.keywords.is_empty());
        assert_eq!(profile.scoping, ScopeStyle::Braces);
    }
}
