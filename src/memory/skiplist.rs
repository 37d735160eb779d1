use std::{cmp::Ordering, fmt, ops::Bound};

use rand::rngs::StdRng;
use smallvec::{smallvec, SmallVec};

use crate::{error::SkipListError, kv::entry::Entry, options::SkipListOptions};

use iterator::{Iter, Range};
use level::{CoinFlip, LevelGenerator};

pub mod iterator;
pub mod level;

pub const DEFAULT_MAX_LEVEL: usize = 16;
// predecessor buffers up to this many levels stay on the stack
const INLINE_LEVELS: usize = 64;

// index of a node slot in SkipList::nodes
type NodeId = usize;
// None at the end of a level
type Link = Option<NodeId>;
// one predecessor per level, None stands for the head
type Predecessors = SmallVec<[Link; INLINE_LEVELS]>;

struct Head {
    forward: Vec<Link>,
}

impl Head {
    fn new(max_level: usize) -> Result<Self, SkipListError> {
        Ok(Head { forward: reserve_links(max_level)? })
    }
}

// empty link vector with room for exactly `level` links
fn reserve_links(level: usize) -> Result<Vec<Link>, SkipListError> {
    let mut links = Vec::new();
    links
        .try_reserve_exact(level)
        .map_err(|_| SkipListError::Allocation(level))?;
    Ok(links)
}

struct SkipNode<K, V> {
    key: K,
    value: V,
    // length is the node's level, fixed at insertion
    forward: Vec<Link>,
}

/// Ordered map backed by a probabilistic skip list.
///
/// Nodes live in an arena owned by the list and link to each other by slot
/// index, so no node is ever aliased mutably. Vacant slots left behind by
/// `remove` are recycled by later inserts.
pub struct SkipList<K, V, G = CoinFlip<StdRng>> {
    head: Head,
    nodes: Vec<Option<SkipNode<K, V>>>,
    free: Vec<NodeId>,
    max_level: usize,
    // highest level holding a real node, 0 when empty
    current_level: usize,
    len: usize,
    leveler: G,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Creates a list whose leveling policy is seeded from OS entropy.
    pub fn new(max_level: usize) -> Result<Self, SkipListError> {
        Self::with_level_generator(max_level, CoinFlip::from_entropy())
    }

    /// Creates a list with a deterministic leveling policy.
    pub fn with_seed(max_level: usize, seed: u64) -> Result<Self, SkipListError> {
        Self::with_level_generator(max_level, CoinFlip::from_seed(seed))
    }

    pub fn from_options(options: &SkipListOptions) -> Result<Self, SkipListError> {
        options.validate()?;
        match options.seed {
            Some(seed) => Self::with_seed(options.max_level, seed),
            None => Self::new(options.max_level),
        }
    }
}

impl<K, V, G> SkipList<K, V, G> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// Releases every node. The list stays usable with the same `max_level`.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head.forward.fill(None);
        self.current_level = 0;
        self.len = 0;
    }

    /// Iterates over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.head.forward[0])
    }

    fn node(&self, id: NodeId) -> &SkipNode<K, V> {
        self.nodes[id]
            .as_ref()
            .expect("link points at a vacant slot")
    }

    fn entry(&self, link: Link) -> Option<Entry<'_, K, V>> {
        link.map(|id| {
            let node = self.node(id);
            Entry { key: &node.key, value: &node.value }
        })
    }

    // successor of `at` (head when None) on `level`
    fn next(&self, at: Link, level: usize) -> Link {
        match at {
            None => self.head.forward[level],
            Some(id) => self.node(id).forward[level],
        }
    }

    fn set_next(&mut self, at: Link, level: usize, to: Link) {
        match at {
            None => self.head.forward[level] = to,
            Some(id) => {
                self.nodes[id]
                    .as_mut()
                    .expect("link points at a vacant slot")
                    .forward[level] = to
            }
        }
    }
}

impl<K: Ord, V, G: LevelGenerator> SkipList<K, V, G> {
    /// Creates an empty list drawing node levels from `leveler`.
    ///
    /// `max_level` must be at least 1.
    pub fn with_level_generator(max_level: usize, leveler: G) -> Result<Self, SkipListError> {
        if max_level == 0 {
            return Err(SkipListError::InvalidMaxLevel(max_level));
        }
        let mut head = Head::new(max_level)?;
        head.forward.resize(max_level, None);
        Ok(Self {
            head,
            nodes: Vec::new(),
            free: Vec::new(),
            max_level,
            current_level: 0,
            len: 0,
            leveler,
        })
    }

    /// Inserts `key` with `value`.
    ///
    /// An existing key is left untouched and `DuplicateKey` is returned.
    /// Node storage is reserved after the duplicate check and before any link
    /// is rewritten, so on any error the list is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), SkipListError> {
        let level = self.leveler.random_level(self.max_level);
        if level == 0 || level > self.max_level {
            return Err(SkipListError::InvalidLevel {
                level,
                max_level: self.max_level,
            });
        }

        let mut update: Predecessors = smallvec![None; self.max_level];
        if let Some(id) = self.find_predecessors(&key, &mut update) {
            if self.node(id).key == key {
                return Err(SkipListError::DuplicateKey);
            }
        }

        // reserve everything up front so a failed allocation cannot leave a partial splice
        let mut forward = reserve_links(level)?;
        if self.free.is_empty() {
            self.nodes
                .try_reserve(1)
                .map_err(|_| SkipListError::Allocation(level))?;
        }

        // levels above current_level keep the head as predecessor
        for (i, pred) in update.iter().take(level).enumerate() {
            forward.push(self.next(*pred, i));
        }
        let node = SkipNode { key, value, forward };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        for (i, pred) in update.iter().take(level).enumerate() {
            self.set_next(*pred, i, Some(id));
        }

        self.current_level = self.current_level.max(level - 1);
        self.len += 1;
        Ok(())
    }

    /// Unlinks `key` and hands back its value.
    pub fn remove(&mut self, key: &K) -> Result<V, SkipListError> {
        let mut update: Predecessors = smallvec![None; self.max_level];
        let target = match self.find_predecessors(key, &mut update) {
            Some(id) if self.node(id).key == *key => id,
            _ => return Err(SkipListError::NotFound),
        };

        let node = self.nodes[target]
            .take()
            .expect("link points at a vacant slot");
        for (i, next) in node.forward.iter().enumerate() {
            self.set_next(update[i], i, *next);
        }

        // drop emptied top levels, scanning down from the old current level
        while self.current_level > 0 && self.head.forward[self.current_level].is_none() {
            self.current_level -= 1;
        }

        self.len -= 1;
        if self.len == 0 {
            // nothing left to reuse, give the arena back
            self.nodes = Vec::new();
            self.free = Vec::new();
        } else {
            self.free.push(target);
        }
        Ok(node.value)
    }
}

impl<K: Ord, V, G> SkipList<K, V, G> {
    pub fn search(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.node(id).value)
    }

    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.nodes[id].as_mut().map(|node| &mut node.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Entry with the greatest key.
    pub fn find_last(&self) -> Option<Entry<'_, K, V>> {
        let mut pred: Link = None;
        for level in (0..=self.current_level).rev() {
            while let Some(id) = self.next(pred, level) {
                pred = Some(id);
            }
        }
        self.entry(pred)
    }

    /// Entry with the greatest key strictly less than `key`.
    pub fn find_less_than(&self, key: &K) -> Option<Entry<'_, K, V>> {
        let mut update: Predecessors = smallvec![None; self.max_level];
        self.find_predecessors(key, &mut update);
        self.entry(update[0])
    }

    /// Entry with the smallest key greater than or equal to `key`.
    pub fn find_greater_or_equal(&self, key: &K) -> Option<Entry<'_, K, V>> {
        self.entry(self.seek(key))
    }

    /// Entries between `lower` and `upper` in ascending key order.
    pub fn range(&self, lower: Bound<&K>, upper: Bound<&K>) -> Range<'_, K, V>
    where
        K: Clone,
    {
        let start = match lower {
            Bound::Included(key) => self.seek(key),
            Bound::Excluded(key) => match self.seek(key) {
                Some(id) if self.node(id).key == *key => self.node(id).forward[0],
                link => link,
            },
            Bound::Unbounded => self.head.forward[0],
        };
        Range::new(Iter::new(&self.nodes, start), upper.cloned())
    }

    // descends from current_level keeping at each level the last node whose
    // key is < `key`; returns that node's level 0 successor
    fn find_predecessors(&self, key: &K, update: &mut Predecessors) -> Link {
        let mut pred: Link = None;
        for level in (0..=self.current_level).rev() {
            while let Some(id) = self.next(pred, level) {
                if self.node(id).key < *key {
                    pred = Some(id);
                } else {
                    break;
                }
            }
            update[level] = pred;
        }
        self.next(pred, 0)
    }

    // exact match, returning as soon as any level hits it
    fn find(&self, key: &K) -> Link {
        match self.seek(key) {
            Some(id) if self.node(id).key == *key => Some(id),
            _ => None,
        }
    }

    // first node with key >= `key`
    fn seek(&self, key: &K) -> Link {
        let mut pred: Link = None;
        let mut cur: Link = None;
        for level in (0..=self.current_level).rev() {
            cur = self.next(pred, level);
            while let Some(id) = cur {
                match self.node(id).key.cmp(key) {
                    Ordering::Less => {
                        pred = cur;
                        cur = self.node(id).forward[level];
                    }
                    Ordering::Equal => return cur,
                    Ordering::Greater => break,
                }
            }
        }
        cur
    }
}

impl<K: fmt::Display, V, G> fmt::Display for SkipList<K, V, G> {
    /// One line per level, topmost first: `head->1->5->NULL`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in (0..=self.current_level).rev() {
            write!(f, "head->")?;
            let mut cur = self.head.forward[level];
            while let Some(id) = cur {
                let node = self.node(id);
                write!(f, "{}->", node.key)?;
                cur = node.forward[level];
            }
            writeln!(f, "NULL")?;
        }
        Ok(())
    }
}
