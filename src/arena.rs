use crate::error::ArenaError;

use log::trace;

/// Handle to a node inside an [`Arena`]. Only meaningful for the arena that
/// issued it, and only until that arena is reset.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub struct NodeRef(usize);

impl NodeRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub left: Option<NodeRef>,
    pub right: Option<NodeRef>,
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Fixed-capacity bump allocator for [`Node`]s.
///
/// Storage is reserved once in [`Arena::new`] and never grows. The number of
/// live nodes acts as the cursor: [`Arena::allocate`] pushes one slot and
/// [`Arena::reset`] drops the cursor back to zero without releasing memory.
#[derive(Debug)]
pub struct Arena {
    nodes: Vec<Node>,
    capacity: usize,
}

impl Arena {
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        if capacity == 0 {
            return Err(ArenaError::InvalidCapacity);
        }

        // Vec allocations are limited to isize::MAX bytes.
        let overflow = ArenaError::CapacityOverflow { capacity };
        let bytes = capacity
            .checked_mul(std::mem::size_of::<Node>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(overflow)?;

        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity).map_err(|_| overflow)?;
        trace!("arena: reserved {capacity} nodes ({bytes} bytes)");

        Ok(Self { nodes, capacity })
    }

    /// Arena large enough for a tree of `depth`: `2^(depth+1)` nodes, which
    /// also fits a stretch tree one level deeper.
    pub fn for_depth(depth: u32) -> Result<Self, ArenaError> {
        let capacity = depth
            .checked_add(1)
            .and_then(|exp| 2usize.checked_pow(exp))
            .ok_or(ArenaError::CapacityOverflow {
                capacity: usize::MAX,
            })?;
        Self::new(capacity)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.nodes.len()
    }

    #[inline]
    pub fn allocate(&mut self) -> Result<NodeRef, ArenaError> {
        let cursor = self.nodes.len();
        if cursor == self.capacity {
            return Err(ArenaError::ArenaExhausted {
                capacity: self.capacity,
            });
        }
        // Never reallocates: capacity was reserved up front.
        self.nodes.push(Node::default());
        Ok(NodeRef(cursor))
    }

    #[inline]
    pub fn get(&self, node_id: NodeRef) -> Result<&Node, ArenaError> {
        let len = self.nodes.len();
        self.nodes.get(node_id.0).ok_or(ArenaError::InvalidHandle {
            index: node_id.0,
            len,
        })
    }

    #[inline]
    pub fn get_mut(&mut self, node_id: NodeRef) -> Result<&mut Node, ArenaError> {
        let len = self.nodes.len();
        self.nodes.get_mut(node_id.0).ok_or(ArenaError::InvalidHandle {
            index: node_id.0,
            len,
        })
    }

    /// Invalidates every handle issued so far. O(1): `Node` is `Copy`, so
    /// clearing only moves the cursor.
    #[inline]
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    pub fn destroy(self) {
        trace!("arena: releasing {} nodes", self.capacity);
        drop(self);
    }
}
