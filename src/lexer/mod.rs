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

mod token;

pub use token::{Token, TokenKind};

use tracing::debug;

/// The two-character operators, tried before their one-character prefixes.
const TWO_CHAR_OPERATORS: [&str; 12] = [
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
];

/// Scans `source` into a token sequence, classifying identifier-like words
/// against the caller's `keywords` and `datatypes` vocabularies.
///
/// Total: never fails. Characters the scanner cannot place become UNKNOWN
/// tokens, and unterminated strings or block comments simply end at end of
/// input.
pub fn tokenize(source: &str, keywords: &[String], datatypes: &[String]) -> Vec<Token> {
    let mut lexer = Lexer::new(source, keywords, datatypes);
    lexer.scan_tokens();
    debug!(tokens = lexer.tokens.len(), "tokenize complete");
    lexer.tokens
}

/// Scanner state. One instance per `tokenize` call, so no cursor survives
/// between analyses.
struct Lexer<'a> {
    chars: Vec<char>,
    keywords: &'a [String],
    datatypes: &'a [String],
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &str, keywords: &'a [String], datatypes: &'a [String]) -> Self {
        Self {
            chars: source.chars().collect(),
            keywords,
            datatypes,
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn scan_tokens(&mut self) {
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }
    }

    fn scan_token(&mut self) {
        let line = self.line;
        let column = self.column;
        let ch = self.peek();

        if ch.is_ascii_digit() {
            self.number(line, column);
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            self.identifier(line, column);
        } else if ch == '"' || ch == '\'' {
            self.string(line, column);
        } else {
            let pair: String = [ch, self.peek_next()].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.advance();
                self.advance();
                self.tokens
                    .push(Token::new(two_char_kind(&pair), pair, line, column));
            } else {
                let ch = self.advance();
                self.tokens
                    .push(Token::new(single_char_kind(ch), ch.to_string(), line, column));
            }
        }
    }

    /// Whitespace and comments. Line comments run to end of line, block
    /// comments to the first `*/` (no nesting), both may be unterminated.
    fn skip_trivia(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == '*' => {
                    self.advance();
                    self.advance();
                    while !self.is_at_end() {
                        if self.peek() == '*' && self.peek_next() == '/' {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn number(&mut self, line: usize, column: usize) {
        let mut value = String::new();
        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance());
            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }
        self.tokens.push(Token::new(TokenKind::Number, value, line, column));
    }

    fn identifier(&mut self, line: usize, column: usize) {
        let mut value = String::new();
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            value.push(self.advance());
        }

        let kind = if self.keywords.iter().any(|k| k == &value) {
            TokenKind::Keyword
        } else if self.datatypes.iter().any(|d| d == &value) {
            TokenKind::Datatype
        } else {
            TokenKind::Identifier
        };

        self.tokens.push(Token::new(kind, value, line, column));
    }

    /// Strings keep their delimiting quotes in the token value. `\` escapes
    /// the following character verbatim; an embedded newline advances the
    /// line counter; a missing close quote ends the token at end of input.
    fn string(&mut self, line: usize, column: usize) {
        let delimiter = self.advance();
        let mut value = String::new();
        value.push(delimiter);

        while !self.is_at_end() {
            let ch = self.peek();
            if ch == delimiter {
                value.push(self.advance());
                break;
            }
            if ch == '\\' {
                value.push(self.advance());
                if !self.is_at_end() {
                    value.push(self.advance());
                }
            } else {
                value.push(self.advance());
            }
        }

        self.tokens.push(Token::new(TokenKind::String, value, line, column));
    }

    /// Consumes one character, keeping the 1-based line/column bookkeeping
    /// in step.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&self) -> char {
        self.chars.get(self.position).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.position + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }
}

fn two_char_kind(pair: &str) -> TokenKind {
    match pair {
        "==" | "!=" | "<=" | ">=" => TokenKind::Comparison,
        "&&" | "||" => TokenKind::Logical,
        "++" | "--" => TokenKind::Increment,
        _ => TokenKind::Assignment,
    }
}

fn single_char_kind(ch: char) -> TokenKind {
    match ch {
        '+' | '-' | '*' | '/' | '%' => TokenKind::Operator,
        '=' | '<' | '>' | '!' => TokenKind::Comparison,
        '&' | '|' => TokenKind::Logical,
        '(' | ')' | '{' | '}' | '[' | ']' => TokenKind::Bracket,
        ';' | ',' | '.' => TokenKind::Punctuation,
        _ => TokenKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        tokenize(source, &[], &[])
    }

    fn scan_c(source: &str) -> Vec<Token> {
        let keywords = vec!["if".to_string(), "return".to_string()];
        let datatypes = vec!["int".to_string()];
        tokenize(source, &keywords, &datatypes)
    }

    #[test]
    fn statement_with_comment() {
        let tokens = scan("x = 10; // comment\n");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].value, "x");
        assert_eq!(tokens[1].kind, TokenKind::Comparison);
        assert_eq!(tokens[1].value, "=");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].value, "10");
        assert_eq!(tokens[3].kind, TokenKind::Punctuation);
        assert_eq!(tokens[3].value, ";");
    }

    #[test]
    fn keyword_and_datatype_classification() {
        let tokens = scan_c("int x; if (x) return x;");
        assert_eq!(tokens[0].kind, TokenKind::Datatype);
        assert_eq!(tokens[3].kind, TokenKind::Keyword);
        assert_eq!(tokens[4].kind, TokenKind::Bracket);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::Identifier));
    }

    #[test]
    fn two_char_operators_win_over_prefixes() {
        let tokens = scan("a == b != c <= d >= e && f || g ++ -- += -= *= /=");
        let values: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Identifier)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(
            values,
            vec!["==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/="]
        );
        assert_eq!(tokens[1].kind, TokenKind::Comparison);
        let increments: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Increment)
            .collect();
        assert_eq!(increments.len(), 2);
    }

    #[test]
    fn block_comment_spans_lines() {
        let tokens = scan("a /* one\ntwo */ b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].value, "b");
    }

    #[test]
    fn string_keeps_quotes_and_escapes() {
        let tokens = scan(r#"x = "he said \"hi\"";"#);
        let string = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert_eq!(string.value, r#""he said \"hi\"""#);
    }

    #[test]
    fn string_with_embedded_newline_counts_lines() {
        let tokens = scan("\"a\nb\" x");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string_ends_at_eof() {
        let tokens = scan("\"open");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, "\"open");
    }

    #[test]
    fn unknown_characters_are_emitted() {
        let tokens = scan("a @ b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].value, "@");
    }

    #[test]
    fn decimal_numbers() {
        let tokens = scan("3.14 5. 7");
        assert_eq!(tokens[0].value, "3.14");
        // a dot without trailing digits is punctuation, not part of the number
        assert_eq!(tokens[1].value, "5");
        assert_eq!(tokens[2].kind, TokenKind::Punctuation);
        assert_eq!(tokens[3].value, "7");
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = scan("a\n  b");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }
}
