//! Capacity-limited entity pools
//!
//! Entities are appended and never freed individually; the only reset is
//! [`Pool::clear`], which drops every entity before the cursor returns to 0.

use crate::error::{DelaunayError, Result};

/// Append-only storage with a hard capacity
#[derive(Debug, Clone)]
pub struct Pool<T> {
    name: &'static str,
    capacity: usize,
    items: Vec<T>,
}

impl<T> Pool<T> {
    /// Create an empty pool that refuses to grow past `capacity`
    ///
    /// Storage is allocated as items arrive; `capacity` is only a limit.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            items: Vec::new(),
        }
    }

    /// Store an item and return its slot
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the pool is full
    pub fn alloc(&mut self, item: T) -> Result<usize> {
        self.reserve(1)?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Check that `count` more items fit
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if they do not
    pub fn reserve(&self, count: usize) -> Result<()> {
        if self.items.len().saturating_add(count) > self.capacity {
            return Err(DelaunayError::CapacityExceeded {
                pool: self.name,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Slot the next allocation will use
    #[inline]
    pub fn next_index(&self) -> usize {
        self.items.len()
    }

    /// Drop every item and reset the cursor
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of allocated items (the high-water mark)
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maximum number of items
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over allocated items in allocation order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> std::ops::Index<usize> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}
