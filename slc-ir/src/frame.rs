//! Frame-offset allocation
//!
//! Locals and temporaries grow downward from a per-method zero base in
//! visitation order, 4 bytes per slot. An array of capacity N occupies N
//! consecutive slots and its declared offset is the address of its last
//! element, so element *i* lives at `declared − 4·(N−1) + 4·i`.
//! Arguments are read upward from `+8(%ebp)` in declaration order, the
//! caller having pushed them right to left.

/// Per-method frame layout state
#[derive(Debug, Clone, Default)]
pub struct FrameAllocator {
    next: i32,
    slots: u32,
}

impl FrameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate one 4-byte slot, returning its offset
    pub fn alloc_scalar(&mut self) -> i32 {
        self.next -= 4;
        self.slots += 1;
        self.next
    }

    /// Allocate `capacity` consecutive slots, returning the declared
    /// offset (the last element's address)
    pub fn alloc_array(&mut self, capacity: u32) -> i32 {
        debug_assert!(capacity > 0);
        self.next -= 4 * capacity as i32;
        self.slots += capacity;
        self.next + 4 * (capacity as i32 - 1)
    }

    /// Total slots requested so far
    pub fn slots(&self) -> u32 {
        self.slots
    }

    /// Byte count for the method's `RESERVE`
    pub fn reserve_bytes(&self) -> u32 {
        4 * self.slots
    }

    /// Frame offset of the argument at `position` (0-based, declaration
    /// order)
    pub fn param_offset(position: usize) -> i32 {
        8 + 4 * position as i32
    }
}
