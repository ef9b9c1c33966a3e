//! Dependency trees built from flat head pointers
//!
//! A [`DependencyTree`] is an arena over a sentence's tokens with parent and
//! child index arrays. Construction rejects sentences that do not form a
//! single rooted tree: no root, several roots, a head that names no token,
//! or tokens that cannot be reached from the root (a cycle). All traversals
//! use an explicit stack.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use crate::document::{Sentence, Token};

/// Position of a token within its sentence's token vector
pub type NodeId = usize;

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("Sentence has no tokens")]
    Empty,

    #[error("No root token (HEAD = 0) found")]
    NoRoot,

    #[error("Multiple root tokens: {0:?}")]
    MultipleRoots(Vec<usize>),

    #[error("Token {token} has HEAD {head}, which is not in the sentence")]
    DanglingHead { token: usize, head: usize },

    #[error("Tokens {0:?} are not reachable from the root (cycle)")]
    Cycle(Vec<usize>),
}

/// A validated dependency tree over one sentence
#[derive(Debug, Clone)]
pub struct DependencyTree<'a> {
    tokens: &'a [Token],
    root: NodeId,
    parents: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
}

impl<'a> DependencyTree<'a> {
    pub fn build(sentence: &'a Sentence) -> Result<Self, TreeError> {
        Self::from_tokens(&sentence.tokens)
    }

    pub fn from_tokens(tokens: &'a [Token]) -> Result<Self, TreeError> {
        if tokens.is_empty() {
            return Err(TreeError::Empty);
        }

        let positions: FxHashMap<usize, NodeId> = tokens
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.index, pos))
            .collect();

        let mut parents = vec![None; tokens.len()];
        let mut children = vec![Vec::new(); tokens.len()];
        let mut roots = Vec::new();

        for (pos, token) in tokens.iter().enumerate() {
            if token.head == 0 {
                roots.push(pos);
                continue;
            }
            let Some(&head) = positions.get(&token.head) else {
                return Err(TreeError::DanglingHead {
                    token: token.index,
                    head: token.head,
                });
            };
            parents[pos] = Some(head);
            children[head].push(pos);
        }

        let root = match roots.as_slice() {
            [] => return Err(TreeError::NoRoot),
            [root] => *root,
            _ => {
                return Err(TreeError::MultipleRoots(
                    roots.iter().map(|&pos| tokens[pos].index).collect(),
                ));
            }
        };

        let tree = Self {
            tokens,
            root,
            parents,
            children,
        };

        // Every token has exactly one parent, so anything the root cannot
        // reach sits on or below a cycle
        let mut reached = vec![false; tokens.len()];
        for pos in tree.preorder_ids() {
            reached[pos] = true;
        }
        let unreachable: Vec<usize> = reached
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(pos, _)| tokens[pos].index)
            .collect();
        if !unreachable.is_empty() {
            return Err(TreeError::Cycle(unreachable));
        }

        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn root(&self) -> &'a Token {
        &self.tokens[self.root]
    }

    pub fn token(&self, id: NodeId) -> Option<&'a Token> {
        self.tokens.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<&'a Token> {
        self.parents
            .get(id)
            .copied()
            .flatten()
            .map(|p| &self.tokens[p])
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &'a Token> + '_ {
        let tokens = self.tokens;
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&c| &tokens[c])
    }

    /// Number of edges between a token and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(Some(parent)) = self.parents.get(current) {
            depth += 1;
            current = *parent;
        }
        depth
    }

    /// Node ids in depth-first preorder, children in sentence order
    fn preorder_ids(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.tokens.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children[id].iter().rev());
        }
        order
    }

    /// Tokens in depth-first preorder
    pub fn preorder(&self) -> Vec<&'a Token> {
        self.preorder_ids()
            .into_iter()
            .map(|id| &self.tokens[id])
            .collect()
    }

    /// Nested representation, assembled bottom-up without recursion
    pub fn to_node(&self) -> TreeNode<'a> {
        let order = self.preorder_ids();
        let mut built: Vec<Option<TreeNode<'a>>> = vec![None; self.tokens.len()];

        // Reverse preorder visits every child before its parent
        for &id in order.iter().skip(1).rev() {
            built[id] = Some(self.assemble(id, &mut built));
        }
        self.assemble(self.root, &mut built)
    }

    fn assemble(&self, id: NodeId, built: &mut [Option<TreeNode<'a>>]) -> TreeNode<'a> {
        TreeNode {
            token: &self.tokens[id],
            children: self.children[id]
                .iter()
                .filter_map(|&c| built[c].take())
                .collect(),
        }
    }
}

/// A token with its dependents, for presentation
///
/// Dropping and comparing walk the tree with an explicit stack; `Clone` and
/// `Serialize` recurse once per level.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'a> {
    pub token: &'a Token,
    pub children: Vec<TreeNode<'a>>,
}

impl Drop for TreeNode<'_> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl PartialEq for TreeNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.token != b.token || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl TreeNode<'_> {
    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
