//! Heap-allocated baseline: one `Box` per node, freed when the tree drops.

#[derive(Debug, Default)]
pub struct Node {
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

pub type Tree = Option<Box<Node>>;

pub fn build(depth: u32) -> Tree {
    if depth == 0 {
        return None;
    }
    Some(Box::new(Node {
        left: build(depth - 1),
        right: build(depth - 1),
    }))
}

pub fn checksum(tree: &Tree) -> u64 {
    match tree {
        None => 1,
        Some(node) => 1 + checksum(&node.left) + checksum(&node.right),
    }
}
