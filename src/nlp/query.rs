//! Dependency-tree traversal over the token arena.

use super::document::{ParsedDocument, Span, TokenIdx};

/// Walks from a token's head up to the root.
pub struct Ancestors<'a> {
    doc: &'a ParsedDocument,
    current: TokenIdx,
}

impl Iterator for Ancestors<'_> {
    type Item = TokenIdx;

    fn next(&mut self) -> Option<TokenIdx> {
        let head = self.doc.head(self.current)?;
        self.current = head;
        Some(head)
    }
}

impl ParsedDocument {
    /// Syntactic head, `None` for a root.
    pub fn head(&self, i: TokenIdx) -> Option<TokenIdx> {
        let token = self.token(i);
        if token.is_root() {
            None
        } else {
            Some(token.head)
        }
    }

    pub fn ancestors(&self, i: TokenIdx) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            current: i,
        }
    }

    pub fn children_with_dep(&self, i: TokenIdx, deps: &[&str]) -> Vec<TokenIdx> {
        self.children(i)
            .iter()
            .copied()
            .filter(|&c| self.token(c).has_dep(deps))
            .collect()
    }

    pub fn first_child_with_dep(&self, i: TokenIdx, deps: &[&str]) -> Option<TokenIdx> {
        self.children(i)
            .iter()
            .copied()
            .find(|&c| self.token(c).has_dep(deps))
    }

    /// Matching descendants in pre-order (a match precedes its own matches).
    pub fn descendants_with_dep(&self, i: TokenIdx, deps: &[&str]) -> Vec<TokenIdx> {
        let mut out = Vec::new();
        let mut stack: Vec<TokenIdx> = self.children(i).iter().rev().copied().collect();
        while let Some(c) = stack.pop() {
            if self.token(c).has_dep(deps) {
                out.push(c);
            }
            stack.extend(self.children(c).iter().rev().copied());
        }
        out
    }

    /// Children of every token in the span whose role matches, ordered by
    /// head position then child position. Children may lie outside the span.
    pub fn span_dependents(&self, span: Span, deps: &[&str]) -> Vec<TokenIdx> {
        span.indices()
            .flat_map(|i| self.children(i).iter().copied())
            .filter(|&c| self.token(c).has_dep(deps))
            .collect()
    }

    pub fn span_has_dep(&self, span: Span, dep: &str) -> bool {
        span.indices().any(|i| self.token(i).dep == dep)
    }

    /// Other members of the coordination group `i` belongs to, in token order.
    pub fn conjuncts(&self, i: TokenIdx) -> Vec<TokenIdx> {
        let mut root = i;
        while self.token(root).dep == "conj" {
            match self.head(root) {
                Some(h) => root = h,
                None => break,
            }
        }

        let mut group = vec![root];
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            for c in self.children_with_dep(current, &["conj"]) {
                group.push(c);
                stack.push(c);
            }
        }
        group.retain(|&t| t != i);
        group.sort_unstable();
        group
    }

    /// Token of the span closest to the tree root; the leftmost wins ties.
    pub fn span_root(&self, span: Span) -> Option<TokenIdx> {
        span.indices().min_by_key(|&i| (self.depth(i), i))
    }

    /// Antecedents of `i`, empty when unresolved.
    pub fn antecedents(&self, i: TokenIdx) -> &[TokenIdx] {
        self.coreference(i).unwrap_or(&[])
    }
}
