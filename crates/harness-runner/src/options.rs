/// Options every harness invocation starts from, in forwarding order.
pub const DEFAULT_OPTIONS: [(&str, &str); 5] = [
    ("verbose", "2"),
    ("initHeap", "20M"),
    ("timeout", "30"),
    ("variableSizeHeap", "false"),
    (REPEAT_KEY, "1"),
];

/// Driver-only control. Consumed by the launcher, never forwarded.
pub const REPEAT_KEY: &str = "repeat";

/// Ordered option map. Keys are unique; writing an existing key replaces the
/// value in place so the forwarding order stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    entries: Vec<(String, String)>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for (key, value) in DEFAULT_OPTIONS {
            store.set(key, value);
        }
        store
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_seeded_in_order() {
        let store = OptionStore::with_defaults();
        let keys: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["verbose", "initHeap", "timeout", "variableSizeHeap", "repeat"]
        );
        assert_eq!(store.get("initHeap"), Some("20M"));
    }

    #[test]
    fn override_keeps_slot_and_does_not_duplicate() {
        let mut store = OptionStore::with_defaults();
        store.set("initHeap", "40M");
        assert_eq!(store.len(), DEFAULT_OPTIONS.len());
        let pairs: Vec<(&str, &str)> = store.iter().collect();
        assert_eq!(pairs[1], ("initHeap", "40M"));
    }

    #[test]
    fn new_keys_append_and_remove_drops_entry() {
        let mut store = OptionStore::with_defaults();
        store.set("scheduler", "DETERMINISTIC");
        assert_eq!(store.iter().last(), Some(("scheduler", "DETERMINISTIC")));
        assert_eq!(store.remove(REPEAT_KEY).as_deref(), Some("1"));
        assert_eq!(store.get(REPEAT_KEY), None);
        assert_eq!(store.remove(REPEAT_KEY), None);
    }
}
