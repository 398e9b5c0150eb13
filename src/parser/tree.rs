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

use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    NonTerminal,
    Terminal,
    Epsilon,
}

/// One node of a derivation tree. Node ids are scoped to a single parse
/// and restart at zero for the next one. A matched terminal carries the
/// input token it consumed and is relabeled to that token's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: usize,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_token: Option<Token>,
}

impl TreeNode {
    /// Longest root-to-leaf path, counted in nodes. A lone node has
    /// depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Flat node storage used while a parse is in flight. The derivation
/// engine wires children to parents by id and materializes the owned
/// `TreeNode` tree once at the end, which sidesteps shared mutable
/// ownership of half-built nodes.
pub(super) struct TreeArena {
    nodes: Vec<ArenaNode>,
}

struct ArenaNode {
    label: String,
    kind: NodeKind,
    children: Vec<usize>,
    token: Option<Token>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add(&mut self, label: impl Into<String>, kind: NodeKind) -> usize {
        let id = self.nodes.len();
        self.nodes.push(ArenaNode {
            label: label.into(),
            kind,
            children: Vec::new(),
            token: None,
        });
        id
    }

    pub fn set_children(&mut self, parent: usize, children: Vec<usize>) {
        self.nodes[parent].children = children;
    }

    /// Records the consumed token and relabels the node to the matched
    /// text.
    pub fn set_token(&mut self, id: usize, token: Token) {
        self.nodes[id].label = token.value.clone();
        self.nodes[id].token = Some(token);
    }

    pub fn build(&self, root: usize) -> TreeNode {
        let node = &self.nodes[root];
        TreeNode {
            id: root,
            label: node.label.clone(),
            kind: node.kind,
            children: node.children.iter().map(|&c| self.build(c)).collect(),
            source_token: node.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_has_depth_one() {
        let mut arena = TreeArena::new();
        let root = arena.add("S", NodeKind::NonTerminal);
        assert_eq!(arena.build(root).depth(), 1);
    }

    #[test]
    fn depth_follows_longest_path() {
        let mut arena = TreeArena::new();
        let root = arena.add("S", NodeKind::NonTerminal);
        let a = arena.add("A", NodeKind::NonTerminal);
        let b = arena.add("b", NodeKind::Terminal);
        let leaf = arena.add("a", NodeKind::Terminal);
        arena.set_children(root, vec![a, b]);
        arena.set_children(a, vec![leaf]);

        let tree = arena.build(root);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[0].label, "a");
    }
}
