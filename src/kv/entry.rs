/// Borrowed view of one stored pair, handed out by lookups and iterators.
#[derive(Debug, PartialEq, Eq)]
pub struct Entry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
}
