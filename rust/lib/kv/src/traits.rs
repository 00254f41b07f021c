use crate::error::KVError;

/// KVStore is the document store behind every module.
///
/// Keys follow a namespaced convention: `{module}:{resource}:{id}`, e.g.
/// `tweet:tweet:3f2a...`. Values are opaque bytes (modules store JSON).
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Atomically write `value` at `key` if the currently stored value equals
    /// `expected` (`None` meaning "key absent").
    ///
    /// Returns `Ok(true)` when the write happened and `Ok(false)` when the
    /// stored value had changed; in that case nothing is written.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, KVError>;
}
