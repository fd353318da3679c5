//! Read access to screener settings, keyed by INI section and key.

pub trait ConfigPort {
    /// Raw value; `None` when the key is absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// A count such as a page size or top-N. Absent or unparsable values
    /// yield `default`.
    fn get_count(&self, section: &str, key: &str, default: usize) -> usize;
}
