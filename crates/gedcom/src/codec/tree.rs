//! Record tree building.
//!
//! Turns the flat, level-numbered line sequence into a forest with one tree
//! per level-0 record. Nodes live in an arena; children are index lists.

use tracing::debug;

use crate::codec::line::Line;

/// One node of the record forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNode<'a> {
    pub level: u32,
    pub xref: Option<&'a str>,
    pub tag: &'a str,
    pub value: &'a str,
    /// Arena indices of the child nodes, in document order.
    pub children: Vec<usize>,
}

impl<'a> From<Line<'a>> for RecordNode<'a> {
    fn from(line: Line<'a>) -> Self {
        Self {
            level: line.level,
            xref: line.xref,
            tag: line.tag,
            value: line.value,
            children: Vec::new(),
        }
    }
}

/// An ordered forest of records, one tree per level-0 line.
#[derive(Debug, Clone, Default)]
pub struct RecordForest<'a> {
    nodes: Vec<RecordNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> RecordForest<'a> {
    /// Builds the forest with a stack of open nodes.
    ///
    /// A level-0 line starts a new root and resets the stack. Any other line
    /// pops the stack while the top is at the same level or deeper, then
    /// becomes the last child of the new top. Level jumps greater than one are
    /// accepted. Lines with no open parent are dropped.
    pub fn build(lines: impl IntoIterator<Item = Line<'a>>) -> Self {
        let mut forest = RecordForest::default();
        let mut stack: Vec<usize> = Vec::new();

        for line in lines {
            if line.level == 0 {
                let index = forest.push(line);
                forest.roots.push(index);
                stack.clear();
                stack.push(index);
                continue;
            }

            while let Some(&top) = stack.last() {
                if forest.nodes[top].level >= line.level {
                    stack.pop();
                } else {
                    break;
                }
            }

            let Some(&parent) = stack.last() else {
                debug!(line = line.number, tag = line.tag, "dropping GEDCOM line with no parent record");
                continue;
            };

            let index = forest.push(line);
            forest.nodes[parent].children.push(index);
            stack.push(index);
        }

        forest
    }

    fn push(&mut self, line: Line<'a>) -> usize {
        self.nodes.push(RecordNode::from(line));
        self.nodes.len() - 1
    }

    /// Number of top-level records.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if the forest has no records.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at all levels.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over the top-level records in document order.
    pub fn roots(&self) -> impl Iterator<Item = Record<'_, 'a>> {
        self.roots.iter().map(move |&index| Record { forest: self, index })
    }

    /// Finds the first top-level record with the given tag.
    pub fn root_with_tag(&self, tag: &str) -> Option<Record<'_, 'a>> {
        self.roots().find(|r| r.tag() == tag)
    }
}

/// A borrowed view of one node and its subtree.
#[derive(Debug, Clone, Copy)]
pub struct Record<'f, 'a> {
    forest: &'f RecordForest<'a>,
    index: usize,
}

impl<'f, 'a> Record<'f, 'a> {
    fn node(&self) -> &'f RecordNode<'a> {
        &self.forest.nodes[self.index]
    }

    pub fn level(&self) -> u32 {
        self.node().level
    }

    pub fn xref(&self) -> Option<&'a str> {
        self.node().xref
    }

    pub fn tag(&self) -> &'a str {
        self.node().tag
    }

    pub fn value(&self) -> &'a str {
        self.node().value
    }

    /// Direct children in document order.
    pub fn children(&self) -> impl Iterator<Item = Record<'f, 'a>> + use<'f, 'a> {
        let forest = self.forest;
        self.node()
            .children
            .iter()
            .map(move |&index| Record { forest, index })
    }

    /// Direct children carrying `tag`.
    pub fn children_with_tag<'t>(
        &self,
        tag: &'t str,
    ) -> impl Iterator<Item = Record<'f, 'a>> + use<'f, 'a, 't> {
        self.children().filter(move |c| c.tag() == tag)
    }

    /// First direct child carrying `tag`.
    pub fn child(&self, tag: &str) -> Option<Record<'f, 'a>> {
        self.children().find(|c| c.tag() == tag)
    }

    /// Value of the first direct child carrying `tag`.
    pub fn child_value(&self, tag: &str) -> Option<&'a str> {
        self.child(tag).map(|c| c.value())
    }
}
