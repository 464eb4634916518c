use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::{
    error::{ContainerError, Result},
    hasher::bucket_index,
};

/// One node of a bucket's chain. Owned by its predecessor, or by the
/// bucket slot when it is the head.
struct LinkedPair<V> {
    key: String,
    /// `None` once the key has been removed; the node stays linked.
    value: Option<V>,
    next: Option<Box<LinkedPair<V>>>,
}

impl<V> LinkedPair<V> {
    fn new(key: String, value: Option<V>) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            next: None,
        })
    }
}

type Bucket<V> = Option<Box<LinkedPair<V>>>;

fn empty_buckets<V>(capacity: usize) -> Box<[Bucket<V>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Hash table with string keys and chained collision resolution.
///
/// The bucket count only changes through [`HashTable::resize`], which
/// doubles it and rehashes every node. There is no automatic growth.
pub struct HashTable<V> {
    storage: Box<[Bucket<V>]>,
    capacity: usize,
    /// Number of chain nodes, including nodes whose value was removed.
    len: usize,
}

/// Point-in-time summary of a table's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub capacity: usize,
    pub len: usize,
    pub live: usize,
    pub occupied_buckets: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
}

impl<V> HashTable<V> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ContainerError::InvalidCapacity);
        }

        Ok(Self {
            storage: empty_buckets(capacity),
            capacity,
            len: 0,
        })
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of nodes across all chains. Removed keys still count.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True only when no node has ever been linked; removed keys keep the
    /// table non-empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_of(&self, key: &str) -> usize {
        bucket_index(key, self.capacity)
    }

    /// Length of the chain in `bucket`, or `None` if there is no such bucket.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        let head = self.storage.get(bucket)?;
        Some(ChainIter { current: head.as_deref() }.count())
    }

    /// Stores `value` under `key`.
    ///
    /// An existing node for `key` has its value overwritten in place,
    /// otherwise a new node is appended to the tail of the bucket's chain.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.insert_pair(key.into(), Some(value));
    }

    fn insert_pair(&mut self, key: String, value: Option<V>) {
        let idx = bucket_index(&key, self.capacity);
        if Self::insert_in_chain(&mut self.storage[idx], key, value) {
            self.len += 1;
        }
    }

    /// Returns whether a new node was linked.
    fn insert_in_chain(head: &mut Bucket<V>, key: String, value: Option<V>) -> bool {
        let mut slot = head;
        while let Some(node) = slot {
            if node.key == key {
                node.value = value;
                return false;
            }
            slot = &mut node.next;
        }

        trace!("linking new node for {key}");
        *slot = Some(LinkedPair::new(key, value));
        true
    }

    /// Looks up the value stored under `key`.
    ///
    /// Returns `None` for keys that were never inserted and for keys that
    /// have been removed.
    pub fn retrieve(&self, key: &str) -> Option<&V> {
        let idx = bucket_index(key, self.capacity);
        ChainIter {
            current: self.storage[idx].as_deref(),
        }
        .find(|node| node.key == key)
        .and_then(|node| node.value.as_ref())
    }

    /// Whether `key` currently maps to a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.retrieve(key).is_some()
    }

    /// Clears the value stored under `key`.
    ///
    /// The node itself is left in its chain with an empty value. Reports
    /// [`ContainerError::KeyNotFound`] (and logs a warning) when the bucket
    /// is empty or its chain has no node for `key`.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let idx = bucket_index(key, self.capacity);

        let mut current = self.storage[idx].as_deref_mut();
        while let Some(node) = current {
            if node.key == key {
                node.value = None;
                return Ok(());
            }
            current = node.next.as_deref_mut();
        }

        warn!("no key found for {key}");
        Err(ContainerError::key_not_found(key))
    }

    /// Doubles the bucket count and rehashes every node, head to tail,
    /// bucket by bucket. Removed values are carried over as removed.
    #[instrument(skip(self), fields(capacity = self.capacity))]
    pub fn resize(&mut self) {
        let new_capacity = self.capacity * 2;
        debug!("resizing table from {} to {} buckets", self.capacity, new_capacity);

        let old_storage = std::mem::replace(&mut self.storage, empty_buckets(new_capacity));
        self.capacity = new_capacity;
        self.len = 0;

        for bucket in old_storage.into_vec() {
            let mut current = bucket;
            while let Some(node) = current {
                let LinkedPair { key, value, next } = *node;
                self.insert_pair(key, value);
                current = next;
            }
        }
    }

    /// Iterates over every node as `(key, value)`, in bucket order and then
    /// chain order. Removed keys yield `None` values.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.storage.iter(),
            chain: ChainIter { current: None },
        }
    }

    pub fn stats(&self) -> TableStats {
        let chain_lens = self
            .storage
            .iter()
            .map(|head| ChainIter { current: head.as_deref() }.count());

        let (occupied_buckets, longest_chain) = chain_lens
            .filter(|&len| len > 0)
            .fold((0, 0), |(occupied, longest), len| (occupied + 1, longest.max(len)));

        #[allow(clippy::cast_precision_loss)]
        let load_factor = self.len as f64 / self.capacity as f64;

        TableStats {
            capacity: self.capacity,
            len: self.len,
            live: self.iter().filter(|(_, value)| value.is_some()).count(),
            occupied_buckets,
            longest_chain,
            load_factor,
        }
    }
}

// iterative, so formatting a long chain does not recurse per node
impl<V: fmt::Debug> fmt::Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        // unlink chains iteratively so long chains don't recurse on drop
        for bucket in self.storage.iter_mut() {
            let mut current = bucket.take();
            while let Some(mut node) = current {
                current = node.next.take();
            }
        }
    }
}

struct ChainIter<'a, V> {
    current: Option<&'a LinkedPair<V>>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = &'a LinkedPair<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node)
    }
}

pub struct Iter<'a, V> {
    buckets: std::slice::Iter<'a, Bucket<V>>,
    chain: ChainIter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.next() {
                return Some((node.key.as_str(), node.value.as_ref()));
            }
            self.chain.current = self.buckets.next()?.as_deref();
        }
    }
}
