//! Perfect binary trees stored in an [`Arena`].

use crate::arena::{Arena, NodeRef};
use crate::error::ArenaError;

/// Root of a tree, or `None` for the empty tree of depth 0.
pub type Tree = Option<NodeRef>;

/// Number of nodes [`build`] allocates for `depth`.
pub fn nodes_for_depth(depth: u32) -> u64 {
    (1u64 << depth) - 1
}

/// What [`checksum`] returns for a perfect tree of `depth`: stored nodes plus
/// empty subtrees.
pub fn checksum_for_depth(depth: u32) -> u64 {
    (1u64 << (depth + 1)) - 1
}

/// Build a perfect tree of `depth` into `arena`.
///
/// The caller sizes the arena; running out surfaces as
/// [`ArenaError::ArenaExhausted`].
pub fn build(arena: &mut Arena, depth: u32) -> Result<Tree, ArenaError> {
    if depth == 0 {
        return Ok(None);
    }
    let node_id = arena.allocate()?;
    let left = build(arena, depth - 1)?;
    let right = build(arena, depth - 1)?;

    let node = arena.get_mut(node_id)?;
    node.left = left;
    node.right = right;
    Ok(Some(node_id))
}

pub fn checksum(arena: &Arena, tree: Tree) -> Result<u64, ArenaError> {
    match tree {
        None => Ok(1),
        Some(node_id) => {
            let node = arena.get(node_id)?;
            Ok(1 + checksum(arena, node.left)? + checksum(arena, node.right)?)
        }
    }
}

/// Same result as [`checksum`] without recursing on the native stack.
pub fn checksum_iterative(arena: &Arena, tree: Tree) -> Result<u64, ArenaError> {
    let mut stack = vec![tree];
    let mut count = 0;
    while let Some(current) = stack.pop() {
        count += 1;
        if let Some(node_id) = current {
            let node = arena.get(node_id)?;
            stack.push(node.right);
            stack.push(node.left);
        }
    }
    Ok(count)
}
