use itertools::Itertools;

use crate::{
    error::{Error, Result},
    frequency::{FrequencyTable, Symbol},
};

/// Index of a node inside a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    Internal {
        left: NodeId,
        right: NodeId,
        frequency: u64,
    },
}

impl Node {
    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf(symbol) => symbol.frequency,
            Node::Internal { frequency, .. } => *frequency,
        }
    }
}

/// Huffman tree stored as an arena of nodes.
///
/// Leaves occupy the first slots in ascending symbol order, internal nodes
/// follow in the order they were merged. Two trees built from the same table
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree greedily, always merging the two lightest nodes.
    /// Returns `None` for an empty table.
    pub fn new(table: &FrequencyTable) -> Result<Option<Self>> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(2 * table.len())?;
        nodes.extend(table.iter().map(Node::Leaf));

        let mut pending = Vec::new();
        pending.try_reserve_exact(nodes.len())?;
        pending.extend((0..nodes.len()).map(NodeId));

        Trees { nodes, pending }.merge()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total weight of the tree, equal to the number of encoded symbols.
    pub fn weight(&self) -> u64 {
        self.node(self.root).frequency()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// A tree over a single symbol has no internal nodes at all.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.node(self.root), Node::Leaf(_))
    }
}

/// Working collection of subtrees waiting to be merged.
struct Trees {
    nodes: Vec<Node>,
    pending: Vec<NodeId>,
}

impl Trees {
    fn merge(mut self) -> Result<Option<HuffmanTree>> {
        loop {
            let Some(result) = self.pop_lowest() else {
                return Ok(None);
            };
            match result {
                PopResult::TreesToMerge { left, right } => {
                    let frequency = self
                        .frequency(left)
                        .checked_add(self.frequency(right))
                        .ok_or_else(|| Error::format("symbol frequencies overflow"))?;

                    self.nodes.try_reserve(1)?;
                    let merged = NodeId(self.nodes.len());
                    self.nodes.push(Node::Internal {
                        left,
                        right,
                        frequency,
                    });
                    self.pending.push(merged);
                }
                PopResult::Single(root) => {
                    return Ok(Some(HuffmanTree {
                        nodes: self.nodes,
                        root,
                    }));
                }
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let left = self.take_lightest()?;

        let result = match self.take_lightest() {
            Some(right) => PopResult::TreesToMerge { left, right },
            None => PopResult::Single(left),
        };

        Some(result)
    }

    /// Removes the lightest pending node. Ties go to the node that sits
    /// earliest in the collection.
    fn take_lightest(&mut self) -> Option<NodeId> {
        let position = self
            .pending
            .iter()
            .position_min_by_key(|&&id| self.frequency(id))?;
        Some(self.pending.remove(position))
    }

    fn frequency(&self, id: NodeId) -> u64 {
        self.nodes[id.0].frequency()
    }
}

enum PopResult {
    TreesToMerge { left: NodeId, right: NodeId },
    Single(NodeId),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{HuffmanTree, Node};
    use crate::frequency::FrequencyTable;

    fn table(frequencies: &[(u8, u64)]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for &(value, frequency) in frequencies {
            table.insert(value, frequency);
        }
        table
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert_eq!(HuffmanTree::new(&FrequencyTable::new()).unwrap(), None);
    }

    #[test]
    fn test_single_symbol_is_a_lone_leaf() {
        let tree = HuffmanTree::new(&table(&[(b'q', 9)])).unwrap().unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.weight(), 9);
    }

    #[rstest]
    #[case(&[(b'a', 1), (b'b', 1)])]
    #[case(&[(b'A', 5), (b'B', 3), (b'C', 2)])]
    #[case(&[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1)])]
    #[case(&[(10, 1), (20, 2), (30, 4), (40, 8), (50, 16), (60, 32)])]
    fn test_node_counts(#[case] frequencies: &[(u8, u64)]) {
        let tree = HuffmanTree::new(&table(frequencies)).unwrap().unwrap();
        assert_eq!(tree.leaf_count(), frequencies.len());
        assert_eq!(tree.internal_count(), frequencies.len() - 1);
        let total: u64 = frequencies.iter().map(|(_, frequency)| frequency).sum();
        assert_eq!(tree.weight(), total);
    }

    #[test]
    fn test_lighter_node_goes_left() {
        let tree = HuffmanTree::new(&table(&[(b'A', 5), (b'B', 3), (b'C', 2)]))
            .unwrap()
            .unwrap();
        let Node::Internal { left, right, .. } = tree.node(tree.root()) else {
            panic!("root should be internal");
        };
        // A (5) ties with the C+B subtree (5) and wins because it is older
        assert!(matches!(tree.node(*left), Node::Leaf(symbol) if symbol.value == b'A'));
        let Node::Internal { left, right, .. } = tree.node(*right) else {
            panic!("right child should be internal");
        };
        assert!(matches!(tree.node(*left), Node::Leaf(symbol) if symbol.value == b'C'));
        assert!(matches!(tree.node(*right), Node::Leaf(symbol) if symbol.value == b'B'));
    }

    #[test]
    fn test_construction_is_deterministic() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let first = HuffmanTree::new(&input.iter().collect::<FrequencyTable>()).unwrap();
        let second = HuffmanTree::new(&input.iter().collect::<FrequencyTable>()).unwrap();
        assert_eq!(first, second);
    }
}
