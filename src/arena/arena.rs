//! Arena structure for trie node storage

use crate::constants::EMPTY;

/// One arena slot: a live element or a link in the free list.
#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(T),
    /// Index of the next free slot, or `EMPTY`.
    Free(u32),
}

/// Generic arena for storing trie nodes.
///
/// Provides contiguous memory allocation with O(1) access by index.
/// Freed slots are chained into an intrusive free list and reused by
/// later allocations, so indices of live elements never move.
///
/// # Type Parameters
/// * `T` - Element type
///
/// # Memory Layout
/// - Elements stored contiguously in Vec
/// - Index-based access (u32 indices, `EMPTY` reserved as the null link)
/// - Grows dynamically as needed; freed slots are recycled LIFO
///
/// # Performance
/// - Allocation: O(1) amortized
/// - Free: O(1)
/// - Access: O(1) by index
#[derive(Debug, Clone)]
pub struct Arena<T> {
    /// Storage for elements.
    ///
    /// Index in this Vec is the arena index used for references.
    slots: Vec<Slot<T>>,

    /// Head of the free list, or `EMPTY`.
    free_head: u32,

    /// Number of occupied slots.
    live: usize,
}

impl<T> Arena<T> {
    /// Create a new empty arena.
    ///
    /// # Performance
    /// O(1) - creates empty Vec
    #[inline(always)]
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: EMPTY,
            live: 0,
        }
    }

    /// Store an element.
    ///
    /// # Returns
    /// Arena index of the element, stable until it is freed
    ///
    /// # Panics
    /// Panics if the arena would exceed `u32::MAX - 1` slots.
    ///
    /// # Performance
    /// O(1) amortized - pops the free list or pushes onto the Vec
    #[inline]
    pub fn alloc(&mut self, value: T) -> u32 {
        self.live += 1;
        if self.free_head != EMPTY {
            let index = self.free_head;
            let slot = &mut self.slots[index as usize];
            self.free_head = match slot {
                Slot::Free(next) => *next,
                Slot::Occupied(_) => unreachable!("free list points at a live slot"),
            };
            *slot = Slot::Occupied(value);
            return index;
        }
        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|&index| index != EMPTY)
            .unwrap_or_else(|| panic!("arena exhausted"));
        self.slots.push(Slot::Occupied(value));
        index
    }

    /// Remove an element and return it.
    ///
    /// # Panics
    /// Panics if the slot is not live.
    ///
    /// # Performance
    /// O(1) - pushes the slot onto the free list
    #[inline]
    pub fn free(&mut self, index: u32) -> T {
        let slot = core::mem::replace(&mut self.slots[index as usize], Slot::Free(self.free_head));
        match slot {
            Slot::Occupied(value) => {
                self.free_head = index;
                self.live -= 1;
                value
            }
            Slot::Free(next) => {
                self.slots[index as usize] = Slot::Free(next);
                panic!("double free of arena slot {}", index)
            }
        }
    }

    /// Get element by index.
    ///
    /// # Panics
    /// Panics if index is out of bounds or the slot is free
    ///
    /// # Performance
    /// O(1) - direct Vec indexing
    #[inline(always)]
    pub fn get(&self, index: u32) -> &T {
        match &self.slots[index as usize] {
            Slot::Occupied(value) => value,
            Slot::Free(_) => panic!("arena slot {} is free", index),
        }
    }

    /// Get mutable element by index.
    ///
    /// # Panics
    /// Panics if index is out of bounds or the slot is free
    #[inline(always)]
    pub fn get_mut(&mut self, index: u32) -> &mut T {
        match &mut self.slots[index as usize] {
            Slot::Occupied(value) => value,
            Slot::Free(_) => panic!("arena slot {} is free", index),
        }
    }

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if no elements are live.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every element and release the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = EMPTY;
        self.live = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
