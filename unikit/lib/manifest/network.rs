use getset::Getters;
use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Static network configuration baked into an image manifest.
///
/// When present, the boot loader configures the interface with this address
/// instead of using DHCP.
///
/// ## Examples
///
/// ```
/// use unikit::manifest::NetworkConfig;
///
/// let config = NetworkConfig::new("10.0.0.2", "10.0.0.1", "255.255.255.0");
/// assert_eq!(config.get_ip(), "10.0.0.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct NetworkConfig {
    /// The static IP address to assign.
    ip: String,

    /// The gateway address.
    gateway: String,

    /// The network mask.
    netmask: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl NetworkConfig {
    /// Creates a new static network configuration.
    pub fn new(
        ip: impl Into<String>,
        gateway: impl Into<String>,
        netmask: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            gateway: gateway.into(),
            netmask: netmask.into(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_config_serialize_deserialize() -> anyhow::Result<()> {
        let config = NetworkConfig::new("10.0.0.2", "10.0.0.1", "255.255.255.0");
        let serialized = serde_json::to_string(&config)?;

        let deserialized: NetworkConfig = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized, config);

        Ok(())
    }
}
