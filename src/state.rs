use std::collections::HashMap;

/// Maps metric names to wire keys.
#[derive(Debug, Default, Clone)]
pub struct KeyTable {
    keys: HashMap<String, u32>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, key: u32) -> Option<u32> {
        self.keys.insert(name, key)
    }

    /// Configured key for `name`, falling back to `name` itself when it is a
    /// decimal `u32`.
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.keys
            .get(name)
            .copied()
            .or_else(|| name.parse::<u32>().ok())
    }
}
