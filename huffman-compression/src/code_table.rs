use crate::{
    code::Code,
    frequency::ALPHABET_SIZE,
    tree::{HuffmanTree, Node, NodeId},
};

/// Code assigned to every symbol present in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    pub fn new(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable {
            codes: std::array::from_fn(|_| None),
        };
        let mut path = Code::new();
        // a lone leaf would otherwise get an empty code that cannot be written
        if tree.is_single_leaf() {
            path.push(false);
        }
        table.generate_codes_inner(tree, tree.root(), &mut path);
        table
    }

    fn generate_codes_inner(&mut self, tree: &HuffmanTree, id: NodeId, current_code: &mut Code) {
        match tree.node(id) {
            Node::Leaf(symbol) => {
                self.codes[symbol.value as usize] = Some(current_code.clone());
            }
            Node::Internal { left, right, .. } => {
                current_code.push(false);
                self.generate_codes_inner(tree, *left, current_code);
                current_code.pop();

                current_code.push(true);
                self.generate_codes_inner(tree, *right, current_code);
                current_code.pop();
            }
        }
    }

    pub fn get(&self, value: u8) -> Option<&Code> {
        self.codes[value as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigned codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(value, code)| code.as_ref().map(|code| (value as u8, code)))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::CodeTable;
    use crate::{frequency::FrequencyTable, tree::HuffmanTree};

    fn codes_for(frequencies: &[(u8, u64)]) -> CodeTable {
        let mut table = FrequencyTable::new();
        for &(value, frequency) in frequencies {
            table.insert(value, frequency);
        }
        let tree = HuffmanTree::new(&table).unwrap().unwrap();
        CodeTable::new(&tree)
    }

    #[test]
    fn test_code_generation() {
        // char_mapping test data comes from
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let char_mapping = [
            (b'C', 32),
            (b'D', 42),
            (b'E', 120),
            (b'K', 7),
            (b'L', 42),
            (b'M', 24),
            (b'U', 37),
            (b'Z', 2),
        ];

        let codes = codes_for(&char_mapping);
        let expected_codes = [
            (b'C', "1110"),
            (b'D', "101"),
            (b'E', "0"),
            (b'K', "111101"),
            (b'L', "110"),
            (b'M', "11111"),
            (b'U', "100"),
            (b'Z', "111100"),
        ];

        assert_eq!(codes.len(), expected_codes.len());
        for (ch, expected_code) in expected_codes {
            let code = codes.get(ch).unwrap();
            assert_eq!(code.to_string(), expected_code)
        }
    }

    #[test]
    fn test_skewed_input_gets_short_code_for_common_symbol() {
        let codes = codes_for(&[(b'A', 5), (b'B', 3), (b'C', 2)]);
        assert_eq!(codes.get(b'A').unwrap().len(), 1);
        assert_eq!(codes.get(b'B').unwrap().len(), 2);
        assert_eq!(codes.get(b'C').unwrap().len(), 2);
        assert_eq!(codes.get(b'D'), None);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let codes = codes_for(&[(b'x', 1000)]);
        assert_eq!(codes.get(b'x').unwrap().to_string(), "0");
    }

    #[rstest]
    #[case(&[(b'a', 1), (b'b', 1)])]
    #[case(&[(0, 3), (7, 3), (9, 3), (200, 3), (255, 3)])]
    #[case(&[(10, 1), (20, 2), (30, 4), (40, 8), (50, 16), (60, 32), (70, 64)])]
    fn test_codes_are_prefix_free(#[case] frequencies: &[(u8, u64)]) {
        let codes = codes_for(frequencies);
        let assigned = codes.iter().collect_vec();
        for ((a, first), (b, second)) in assigned.iter().tuple_combinations() {
            assert!(!first.starts_with(second), "{a}: {first} starts with {b}: {second}");
            assert!(!second.starts_with(first), "{b}: {second} starts with {a}: {first}");
        }
    }

    #[test]
    fn test_full_alphabet() {
        let frequencies = (0..=255_u8)
            .map(|value| (value, u64::from(value) + 1))
            .collect_vec();
        let codes = codes_for(&frequencies);
        assert_eq!(codes.len(), 256);
        assert!(codes.iter().all(|(_, code)| !code.is_empty()));
    }
}
