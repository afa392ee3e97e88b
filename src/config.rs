use std::time::Duration;

pub const METADATA_URL: &str = "http://169.254.169.254/openstack/latest/meta_data.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    pub metadata_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl InventoryConfig {
    pub fn new(metadata_url: impl Into<String>, timeout: Duration) -> Self {
        InventoryConfig {
            metadata_url: metadata_url.into(),
            timeout,
            // Never wait longer for the connection than for the whole request
            connect_timeout: timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig::new(METADATA_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_link_local_metadata_service() {
        let config = InventoryConfig::default();
        assert_eq!(
            config.metadata_url,
            "http://169.254.169.254/openstack/latest/meta_data.json"
        );
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_connect_timeout_capped_by_total_timeout() {
        let config = InventoryConfig::new("http://localhost/", Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }
}
