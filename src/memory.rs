pub mod skiplist;
