//! Parse trees, generic over node keys and leaf payloads.

/// A derivation tree. During parsing the keys are whole productions; the
/// externally visible shape keys nodes by nonterminal and carries the
/// matched input range at each leaf.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyntaxTree<K, L> {
    Leaf(L),
    Node { key: K, children: Vec<SyntaxTree<K, L>> },
}

impl<K, L> SyntaxTree<K, L> {
    pub fn node(key: K, children: Vec<Self>) -> Self {
        SyntaxTree::Node { key, children }
    }

    pub fn leaf(leaf: L) -> Self {
        SyntaxTree::Leaf(leaf)
    }

    /// Key of the root node; `None` for a bare leaf.
    pub fn root(&self) -> Option<&K> {
        match self {
            SyntaxTree::Node { key, .. } => Some(key),
            SyntaxTree::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> &[Self] {
        match self {
            SyntaxTree::Node { children, .. } => children,
            SyntaxTree::Leaf(_) => &[],
        }
    }

    /// Leaf payloads, left to right. Walks with an explicit stack; chains
    /// of single-child nodes nest deeper than the call stack tolerates.
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(t) = stack.pop() {
            match t {
                SyntaxTree::Leaf(l) => out.push(l),
                SyntaxTree::Node { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Number of levels on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            SyntaxTree::Leaf(_) => 1,
            SyntaxTree::Node { children, .. } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}
