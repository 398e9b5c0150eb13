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

//! Scope tracking for semantic analysis.
//!
//! Scopes form a tree rooted at `global`. The declaration pass grows the
//! tree as it walks the token stream and records which scope each token
//! sits in; later passes resolve identifiers by walking parent links from
//! the recorded scope, innermost out. Nothing is ever removed, so scope ids
//! stay valid for the lifetime of one analysis.

/// Interned scope tree plus the stack of currently open scopes.
#[derive(Debug)]
pub(super) struct ScopeTree {
    scopes: Vec<ScopeInfo>,
    stack: Vec<usize>,
}

#[derive(Debug)]
struct ScopeInfo {
    name: String,
    parent: Option<usize>,
}

/// Id of the root scope.
pub(super) const GLOBAL: usize = 0;

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeInfo {
                name: "global".to_string(),
                parent: None,
            }],
            stack: vec![GLOBAL],
        }
    }

    /// Opens a nested scope and returns its id.
    pub fn push(&mut self, name: impl Into<String>) -> usize {
        let id = self.scopes.len();
        self.scopes.push(ScopeInfo {
            name: name.into(),
            parent: Some(self.current()),
        });
        self.stack.push(id);
        id
    }

    /// Closes the current scope. Popping the root is a no-op.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> usize {
        *self.stack.last().unwrap_or(&GLOBAL)
    }

    pub fn name(&self, id: usize) -> &str {
        &self.scopes[id].name
    }

    /// The scope chain from `id` up to and including the root.
    pub fn chain(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(id), move |&current| self.scopes[current].parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_walks_innermost_out() {
        let mut scopes = ScopeTree::new();
        let f = scopes.push("factorial");
        let b = scopes.push("block_7");
        assert_eq!(scopes.chain(b).collect::<Vec<_>>(), vec![b, f, GLOBAL]);
        assert_eq!(scopes.name(f), "factorial");
    }

    #[test]
    fn root_is_never_popped() {
        let mut scopes = ScopeTree::new();
        scopes.push("f");
        assert!(scopes.pop());
        assert!(!scopes.pop());
        assert_eq!(scopes.current(), GLOBAL);
    }
}
