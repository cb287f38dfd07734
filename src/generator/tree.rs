use std::fmt::{Display, Write};

// Derivations can be as deep as the depth limit allows, so nothing here walks
// a tree with native recursion
#[derive(Debug, PartialEq, Clone)]
pub enum ParseTree {
    Leaf(String),
    Node(String, Vec<ParseTree>),
}

// Quotes a symbol the way the tuple notation expects, preferring single quotes
fn quote(symbol: &str) -> String {
    if symbol.contains('\'') && !symbol.contains('"') {
        return format!("\"{}\"", symbol.replace('\\', "\\\\"));
    }
    format!("'{}'", symbol.replace('\\', "\\\\").replace('\'', "\\'"))
}

enum Step<'t> {
    Tree(&'t ParseTree),
    Text(&'static str)
}

enum PrettyStep {
    // Index into `Layout::nodes`, column, closing characters that follow
    Tree(usize, usize, usize),
    Break(usize),
    Text(&'static str)
}

// The nodes of a tree in pre-order, with the subtree size and compact width
// of each
struct Layout<'t> {
    nodes: Vec<&'t ParseTree>,
    sizes: Vec<usize>,
    widths: Vec<usize>
}

impl<'t> Layout<'t> {
    fn new(tree: &'t ParseTree) -> Self {
        let mut nodes = Vec::new();
        let mut pending = vec![tree];
        while let Some(tree) = pending.pop() {
            nodes.push(tree);
            if let ParseTree::Node(_, children) = tree {
                pending.extend(children.iter().rev());
            }
        }

        let mut layout = Layout {
            sizes: vec![1; nodes.len()],
            widths: vec![0; nodes.len()],
            nodes
        };
        // Children follow their parent in pre-order, so walking backwards sees
        // every child before its parent
        for i in (0..layout.nodes.len()).rev() {
            let (size, width) = match layout.nodes[i] {
                ParseTree::Leaf(symbol) => (1, quote(symbol).len()),
                ParseTree::Node(label, children) if children.is_empty() => (1, quote(label).len() + 3),
                ParseTree::Node(label, _) => {
                    let children = layout.children(i);
                    let size = 1 + children.iter().map(|&c| layout.sizes[c]).sum::<usize>();
                    let width = quote(label).len() + 2 + children.iter().map(|&c| layout.widths[c] + 2).sum::<usize>();
                    (size, width)
                }
            };
            layout.sizes[i] = size;
            layout.widths[i] = width;
        }
        layout
    }

    // Only valid once the sizes of the children are known
    fn children(&self, i: usize) -> Vec<usize> {
        let count = match self.nodes[i] {
            ParseTree::Node(_, children) => children.len(),
            ParseTree::Leaf(_) => 0
        };
        let mut children = Vec::with_capacity(count);
        let mut next = i + 1;
        for _ in 0..count {
            children.push(next);
            next += self.sizes[next];
        }
        children
    }
}

impl ParseTree {
    /// The terminals at the leaves, left to right. For a tree generated with
    /// some random source this is the sentence the flat rewriter produces from
    /// the same source.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(tree) = pending.pop() {
            match tree {
                ParseTree::Leaf(symbol) => leaves.push(symbol.as_str()),
                ParseTree::Node(_, children) => pending.extend(children.iter().rev()),
            }
        }
        leaves
    }

    /// Renders the tree in nested-tuple notation, breaking a node over several
    /// lines when it does not fit in `width` columns.
    pub fn pretty(&self, width: usize) -> String {
        let layout = Layout::new(self);
        let mut out = String::new();

        let mut pending = vec![PrettyStep::Tree(0, 0, 0)];
        while let Some(step) = pending.pop() {
            let (i, indent, allowance) = match step {
                PrettyStep::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                PrettyStep::Break(indent) => {
                    out.push_str(",\n");
                    out.extend(std::iter::repeat(' ').take(indent));
                    continue;
                }
                PrettyStep::Tree(i, indent, allowance) => (i, indent, allowance)
            };

            let label = match layout.nodes[i] {
                ParseTree::Node(label, children) if !children.is_empty() && indent + layout.widths[i] + allowance > width => label,
                tree => {
                    out.push_str(&tree.to_string());
                    continue;
                }
            };

            out.push('(');
            out.push_str(&quote(label));
            pending.push(PrettyStep::Text(")"));
            let children = layout.children(i);
            for (n, &child) in children.iter().enumerate().rev() {
                let child_allowance = if n + 1 == children.len() { allowance + 1 } else { 1 };
                pending.push(PrettyStep::Tree(child, indent + 1, child_allowance));
                pending.push(PrettyStep::Break(indent + 1));
            }
        }
        out
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Step::Tree(self)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Tree(ParseTree::Leaf(symbol)) => f.write_str(&quote(symbol))?,
                Step::Tree(ParseTree::Node(label, children)) => {
                    f.write_char('(')?;
                    f.write_str(&quote(label))?;
                    if children.is_empty() {
                        pending.push(Step::Text(",)"));
                        continue;
                    }
                    pending.push(Step::Text(")"));
                    for child in children.iter().rev() {
                        pending.push(Step::Tree(child));
                        pending.push(Step::Text(", "));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for ParseTree {
    fn drop(&mut self) {
        let ParseTree::Node(_, children) = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut tree) = pending.pop() {
            if let ParseTree::Node(_, children) = &mut tree {
                pending.append(children);
            }
        }
    }
}
