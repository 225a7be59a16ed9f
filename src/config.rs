/// Configuration settings for the MH-Z19 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How many write/read rounds a CO2 read may take before giving up.
    pub read_attempts: u8,
    /// Reject full read replies whose trailing checksum does not match.
    pub verify_checksum: bool,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `read_attempts` - Number of rounds for a CO2 read. `0` behaves like `1`.
    /// * `verify_checksum` - Whether read replies must carry a valid checksum.
    pub fn new(read_attempts: u8, verify_checksum: bool) -> Config {
        Config {
            read_attempts,
            verify_checksum,
        }
    }

    /// Sets the number of read attempts.
    pub fn read_attempts(mut self, read_attempts: u8) -> Self {
        self.read_attempts = read_attempts;
        self
    }

    /// Enables or disables response checksum verification.
    pub fn verify_checksum(mut self, verify_checksum: bool) -> Self {
        self.verify_checksum = verify_checksum;
        self
    }

    // Rounds actually performed by a read, never less than one.
    pub(crate) fn attempts(&self) -> u8 {
        self.read_attempts.max(1)
    }
}

/// Provides default configuration values for the MH-Z19 driver.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// A single read attempt and no checksum verification on replies, which is how the
    /// sensor is usually driven.
    fn default() -> Config {
        Config {
            read_attempts: 1,
            verify_checksum: false,
        }
    }
}
