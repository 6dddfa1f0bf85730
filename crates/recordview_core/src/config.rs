//! Store and view configuration.

/// Configuration for opening stores and running views over them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create missing store files on open.
    pub create_if_missing: bool,

    /// Longest property chain a walk follows before reporting corruption.
    pub max_property_chain_length: usize,

    /// Longest dynamic record chain a read follows before reporting corruption.
    pub max_dynamic_chain_length: usize,

    /// Slot size of the string, array and label stores.
    pub dynamic_record_size: usize,

    /// Entities between two scan progress log lines (0 = never).
    pub scan_progress_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            max_property_chain_length: 1_000_000,
            max_dynamic_chain_length: 1_000_000,
            dynamic_record_size: 64,
            scan_progress_interval: 100_000,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create missing store files.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the property chain length limit.
    #[must_use]
    pub const fn max_property_chain_length(mut self, len: usize) -> Self {
        self.max_property_chain_length = len;
        self
    }

    /// Sets the dynamic chain length limit.
    #[must_use]
    pub const fn max_dynamic_chain_length(mut self, len: usize) -> Self {
        self.max_dynamic_chain_length = len;
        self
    }

    /// Sets the dynamic record slot size.
    #[must_use]
    pub const fn dynamic_record_size(mut self, size: usize) -> Self {
        self.dynamic_record_size = size;
        self
    }

    /// Sets the scan progress log interval.
    #[must_use]
    pub const fn scan_progress_interval(mut self, interval: u64) -> Self {
        self.scan_progress_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_if_missing);
        assert_eq!(config.dynamic_record_size, 64);
        assert_eq!(config.max_property_chain_length, 1_000_000);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .create_if_missing(false)
            .max_property_chain_length(8)
            .dynamic_record_size(32);

        assert!(!config.create_if_missing);
        assert_eq!(config.max_property_chain_length, 8);
        assert_eq!(config.dynamic_record_size, 32);
    }
}
