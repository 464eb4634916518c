use tracing::debug;

use crate::error::{ContainerError, Result};

/// Contiguous array with amortized O(1) append.
///
/// Storage is a fixed-length slice of `capacity` slots. Slots at
/// indices `>= len` are always `None`. When an append or insert finds the
/// array full, the storage is replaced by one twice as long.
#[derive(Debug, Clone)]
pub struct DynamicArray<T> {
    storage: Box<[Option<T>]>,
    count: usize,
    capacity: usize,
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<T> DynamicArray<T> {
    pub const DEFAULT_CAPACITY: usize = 8;

    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ContainerError::InvalidCapacity);
        }

        Ok(Self {
            storage: empty_slots(capacity),
            count: 0,
            capacity,
        })
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }
        self.storage[index].as_ref()
    }

    /// Iterates over the live elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.storage[..self.count].iter().flatten()
    }

    pub fn append(&mut self, value: T) {
        if self.count == self.capacity {
            self.double_size();
        }

        self.storage[self.count] = Some(value);
        self.count += 1;
    }

    /// Places `value` at `index`, shifting everything from `index` onwards
    /// one slot to the right.
    ///
    /// Fails with [`ContainerError::OutOfRange`] unless `index <= len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.count {
            return Err(ContainerError::OutOfRange {
                index,
                len: self.count,
            });
        }

        if self.count == self.capacity {
            self.double_size();
        }

        // walk backwards from the first free slot so nothing is overwritten
        for idx in (index + 1..=self.count).rev() {
            self.storage[idx] = self.storage[idx - 1].take();
        }

        self.storage[index] = Some(value);
        self.count += 1;
        Ok(())
    }

    fn double_size(&mut self) {
        let new_capacity = self.capacity * 2;
        debug!("doubling array capacity from {} to {}", self.capacity, new_capacity);

        let mut new_storage = empty_slots(new_capacity);
        for (new_slot, old_slot) in new_storage.iter_mut().zip(&mut self.storage[..self.count]) {
            *new_slot = old_slot.take();
        }

        self.storage = new_storage;
        self.capacity = new_capacity;
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self {
            storage: empty_slots(Self::DEFAULT_CAPACITY),
            count: 0,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}
