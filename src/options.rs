use crate::{
    error::SkipListError,
    memory::skiplist::DEFAULT_MAX_LEVEL,
};

#[derive(Clone, Debug)]
pub struct SkipListOptions {
    pub max_level: usize,
    // None seeds the leveling policy from OS entropy
    pub seed: Option<u64>,
}

impl SkipListOptions {
    pub fn new_with_defaults() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), SkipListError> {
        if self.max_level == 0 {
            return Err(SkipListError::InvalidMaxLevel(self.max_level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::SkipListError, memory::skiplist::SkipList};

    use super::SkipListOptions;

    #[test]
    fn test_defaults() {
        let options = SkipListOptions::new_with_defaults();
        assert_eq!(options.max_level, 16);
        assert!(options.seed.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_tall_lists() {
        let options = SkipListOptions { max_level: 200, seed: Some(2) };
        assert!(options.validate().is_ok());
        let list = SkipList::<u32, u32>::from_options(&options).unwrap();
        assert_eq!(list.max_level(), 200);
    }

    #[test]
    fn test_validate() {
        let options = SkipListOptions { max_level: 0, seed: Some(1) };
        assert_eq!(options.validate(), Err(SkipListError::InvalidMaxLevel(0)));
        let list = SkipList::<u32, u32>::from_options(&options);
        assert_eq!(list.err(), Some(SkipListError::InvalidMaxLevel(0)));
    }

    #[test]
    fn test_seeded_lists_share_shape() {
        let options = SkipListOptions { max_level: 8, seed: Some(17) };
        let mut a = SkipList::from_options(&options).unwrap();
        let mut b = SkipList::from_options(&options).unwrap();
        for k in 0..64u32 {
            a.insert(k, ()).unwrap();
            b.insert(k, ()).unwrap();
        }
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.current_level(), b.current_level());
    }
}
