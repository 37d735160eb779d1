use std::{cmp::Ordering, ops::Bound};

use crate::kv::entry::Entry;

use super::{Link, SkipNode};

/// Walks level 0 of a skip list in ascending key order.
pub struct Iter<'a, K, V> {
    nodes: &'a [Option<SkipNode<K, V>>],
    next: Link,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a [Option<SkipNode<K, V>>], start: Link) -> Self {
        Self { nodes, next: start }
    }

    fn peek(&self) -> Option<&'a SkipNode<K, V>> {
        let nodes = self.nodes;
        self.next.and_then(|id| nodes[id].as_ref())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = Entry<'a, K, V>;

    fn next(&mut self) -> Option<Entry<'a, K, V>> {
        let node = self.peek()?;
        self.next = node.forward[0];
        Some(Entry { key: &node.key, value: &node.value })
    }
}

/// Level 0 walk that stops at an upper bound.
pub struct Range<'a, K, V> {
    iter: Iter<'a, K, V>,
    upper_bound: Bound<K>,
}

impl<'a, K: Ord, V> Range<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>, upper_bound: Bound<K>) -> Self {
        Self { iter, upper_bound }
    }

    fn in_bound(&self, key: &K) -> bool {
        match &self.upper_bound {
            Bound::Included(upper) => matches!(key.cmp(upper), Ordering::Less | Ordering::Equal),
            Bound::Excluded(upper) => key.cmp(upper) == Ordering::Less,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K: Ord, V> Iterator for Range<'a, K, V> {
    type Item = Entry<'a, K, V>;

    fn next(&mut self) -> Option<Entry<'a, K, V>> {
        let node = self.iter.peek()?;
        if !self.in_bound(&node.key) {
            // once past the bound every later key is too
            self.iter.next = None;
            return None;
        }
        self.iter.next()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use crate::{kv::entry::Entry, memory::skiplist::SkipList};

    #[test]
    fn test_iterate() {
        let mut list = SkipList::with_seed(4, 0).unwrap();
        list.insert("k2", "v2").unwrap();
        list.insert("k1", "v1").unwrap();

        let mut iterator = list.iter();
        assert_eq!(iterator.next(), Some(Entry { key: &"k1", value: &"v1" }));
        assert_eq!(iterator.next(), Some(Entry { key: &"k2", value: &"v2" }));
        assert!(iterator.next().is_none());
        assert!(iterator.next().is_none());
    }

    #[test]
    fn test_iterate_empty() {
        let list: SkipList<&str, &str> = SkipList::with_seed(4, 0).unwrap();
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.range(Bound::Unbounded, Bound::Unbounded).count(), 0);
    }

    #[test]
    fn test_bounded() {
        let mut list = SkipList::with_seed(4, 0).unwrap();
        list.insert("k1", "v1").unwrap();
        list.insert("k2", "v2").unwrap();

        let items: Vec<Entry<&str, &str>> = list
            .range(Bound::Unbounded, Bound::Included(&"k1"))
            .collect();
        assert_eq!(items.len(), 1);
        assert_eq!(*items[0].key, "k1");

        let items: Vec<Entry<&str, &str>> = list
            .range(Bound::Unbounded, Bound::Excluded(&"k1"))
            .collect();
        assert_eq!(items.len(), 0);

        let items: Vec<Entry<&str, &str>> = list
            .range(Bound::Unbounded, Bound::Unbounded)
            .collect();
        assert_eq!(items.len(), 2);
    }
}
