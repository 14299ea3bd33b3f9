//! Unbalanced binary search tree over search keys.
//!
//! Shape depends only on insertion order; sorted input degenerates into a list,
//! so every walk here is iterative. Building is single-writer (`&mut self`).
//! Once built, a `Tree` can be shared behind an `Arc` and read from any number
//! of threads without locking.
use std::cmp::Ordering;

use crate::node::{Node, Pair};

#[derive(Debug, Default)]
pub struct Tree {
    root: Option<Box<Node>>,
    key_count: usize,
    token_count: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: Pair) {
        self.token_count += 1;
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            match pair.value.as_str().cmp(node.value.as_str()) {
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
                Ordering::Equal => {
                    node.insert_pair(pair);
                    return;
                }
            }
        }
        *slot = Some(Box::new(Node::from_pair(pair)));
        self.key_count += 1;
    }

    /// Tokens recorded under exactly `value`, in insertion order.
    pub fn find(&self, value: &str) -> Option<&[String]> {
        self.find_node(value).map(Node::tokens)
    }

    fn find_node(&self, value: &str) -> Option<&Node> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match value.cmp(node.value.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Every token in key order; within a key, in insertion order.
    /// Each call starts a fresh walk.
    pub fn in_order_tokens(&self) -> InOrderTokens<'_> {
        InOrderTokens::new(self.root.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Number of tokens across all keys, duplicates included.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Length of the longest root-to-leaf path; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, d)) = stack.pop() {
            deepest = deepest.max(d);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, d + 1));
            }
        }
        deepest
    }
}

// The derived drop would recurse once per level.
impl Drop for Tree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Lazy in-order walk over a tree's tokens, driven by an explicit stack.
pub struct InOrderTokens<'a> {
    stack: Vec<&'a Node>,
    current: Option<std::slice::Iter<'a, String>>,
}

impl<'a> InOrderTokens<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut walk = Self { stack: Vec::new(), current: None };
        walk.descend_left(root);
        walk
    }

    fn descend_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrderTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if let Some(token) = self.current.as_mut().and_then(Iterator::next) {
                return Some(token.as_str());
            }
            let node = self.stack.pop()?;
            self.current = Some(node.tokens.iter());
            self.descend_left(node.right.as_deref());
        }
    }
}

impl std::iter::FusedIterator for InOrderTokens<'_> {}
