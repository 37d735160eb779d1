pub mod error;
pub mod kv;
pub mod memory;
pub mod options;

pub use error::SkipListError;
pub use kv::entry::Entry;
pub use memory::skiplist::SkipList;
