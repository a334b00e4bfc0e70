//! Configuration access port trait.

/// Sectioned key/value settings. Numeric parsing happens in
/// `config_validation::read_number`.
pub trait ConfigPort {
    /// `None` when the section or key is missing or the value is blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
