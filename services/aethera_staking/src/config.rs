//! Runtime configuration.
//!
//! Read once from the environment (and `.env`, if present) at startup, then
//! passed explicitly to whatever needs it.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::chain::{AdminSigner, Contract};
use crate::constants::{
    DEFAULT_MAX_GAS_AMOUNT, DEFAULT_TX_TIMEOUT_SECS, PLAYER_POLL_SECS, VAULT_POLL_SECS,
};
use crate::error::StakingError;
use crate::state::AccountAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Local,
}

impl Network {
    /// Unknown names fall back to testnet.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Network::Mainnet,
            "devnet" => Network::Devnet,
            "local" | "localnet" => Network::Local,
            _ => Network::Testnet,
        }
    }

    pub fn default_node_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            Network::Local => "http://127.0.0.1:8080/v1",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
        };
        f.write_str(name)
    }
}

/// Settings for the API server.
#[derive(Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub network: Network,
    pub node_url: String,
    pub contract: Contract,
    pub admin: Option<AdminSigner>,
    pub cors_origin: Option<String>,
    pub tx_timeout: Duration,
    pub max_gas_amount: u64,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, StakingError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load from an explicit variable map.
    ///
    /// Missing contract addresses or a malformed admin key are errors; an
    /// absent admin key leaves admin endpoints disabled.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, StakingError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port: u16 = parse_or(get("PORT"), "PORT", 3000)?;
        let ip: IpAddr = parse_or(get("BIND_ADDR"), "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;

        let network = get("APTOS_NETWORK")
            .map(Network::from_name)
            .unwrap_or_default();
        let node_url = get("APTOS_NODE_URL")
            .map(str::to_string)
            .unwrap_or_else(|| network.default_node_url().to_string());

        let contract = Contract {
            address: required_address(get("CONTRACT_ADDRESS"), "CONTRACT_ADDRESS")?,
            vault_authority: required_address(
                get("VAULT_AUTHORITY_ADDRESS"),
                "VAULT_AUTHORITY_ADDRESS",
            )?,
        };

        let admin = get("ADMIN_PRIVATE_KEY")
            .map(AdminSigner::from_hex)
            .transpose()?;

        let cors_origin = get("CORS_ORIGIN")
            .filter(|origin| *origin != "*")
            .map(str::to_string);

        let tx_timeout = Duration::from_secs(parse_or(
            get("TX_TIMEOUT_SECS"),
            "TX_TIMEOUT_SECS",
            DEFAULT_TX_TIMEOUT_SECS,
        )?);
        let max_gas_amount = parse_or(get("MAX_GAS_AMOUNT"), "MAX_GAS_AMOUNT", DEFAULT_MAX_GAS_AMOUNT)?;

        Ok(Self {
            bind: SocketAddr::new(ip, port),
            network,
            node_url,
            contract,
            admin,
            cors_origin,
            tx_timeout,
            max_gas_amount,
        })
    }
}

/// Settings for the terminal dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_url: String,
    /// Set when both contract addresses are configured; needed only to
    /// build wallet payloads.
    pub contract: Option<Contract>,
    pub vault_interval: Duration,
    pub player_interval: Duration,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, StakingError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, StakingError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let contract = match (get("CONTRACT_ADDRESS"), get("VAULT_AUTHORITY_ADDRESS")) {
            (Some(address), Some(vault_authority)) => Some(Contract {
                address: required_address(Some(address), "CONTRACT_ADDRESS")?,
                vault_authority: required_address(Some(vault_authority), "VAULT_AUTHORITY_ADDRESS")?,
            }),
            _ => None,
        };

        Ok(Self {
            api_url: get("API_URL")
                .unwrap_or("http://localhost:3000/api")
                .trim_end_matches('/')
                .to_string(),
            contract,
            vault_interval: Duration::from_secs(parse_or(
                get("VAULT_POLL_SECS"),
                "VAULT_POLL_SECS",
                VAULT_POLL_SECS,
            )?),
            player_interval: Duration::from_secs(parse_or(
                get("PLAYER_POLL_SECS"),
                "PLAYER_POLL_SECS",
                PLAYER_POLL_SECS,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<&str>, key: &str, default: T) -> Result<T, StakingError> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| StakingError::Config(format!("{key} has invalid value {raw:?}"))),
        None => Ok(default),
    }
}

fn required_address(value: Option<&str>, key: &str) -> Result<AccountAddress, StakingError> {
    let raw = value.ok_or_else(|| StakingError::Config(format!("{key} is not defined")))?;
    raw.parse()
        .map_err(|_| StakingError::Config(format!("{key} is not a valid address: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CONTRACT_ADDRESS", "0xa11ce"),
            ("VAULT_AUTHORITY_ADDRESS", "0xb0b"),
        ]
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_vars(&vars(&base())).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.node_url, "https://fullnode.testnet.aptoslabs.com/v1");
        assert!(config.admin.is_none());
        assert!(config.cors_origin.is_none());
        assert_eq!(config.tx_timeout, Duration::from_secs(30));
    }

    #[test]
    fn contract_addresses_are_required() {
        let err = ServerConfig::from_vars(&vars(&[("CONTRACT_ADDRESS", "0x1")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("VAULT_AUTHORITY_ADDRESS"));
    }

    #[test]
    fn malformed_admin_key_fails_startup() {
        let mut pairs = base();
        pairs.push(("ADMIN_PRIVATE_KEY", "0xdeadbeef"));
        assert!(matches!(
            ServerConfig::from_vars(&vars(&pairs)),
            Err(StakingError::InvalidAdminKey(_))
        ));
    }

    #[test]
    fn node_url_override_and_network() {
        let mut pairs = base();
        pairs.push(("APTOS_NETWORK", "MAINNET"));
        pairs.push(("APTOS_NODE_URL", "http://node:8080/v1"));
        pairs.push(("PORT", "8081"));
        let config = ServerConfig::from_vars(&vars(&pairs)).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.node_url, "http://node:8080/v1");
        assert_eq!(config.bind.port(), 8081);
    }

    #[test]
    fn unknown_network_is_testnet() {
        assert_eq!(Network::from_name("moonnet"), Network::Testnet);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut pairs = base();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(
            ServerConfig::from_vars(&vars(&pairs)),
            Err(StakingError::Config(_))
        ));
    }

    #[test]
    fn dashboard_defaults() {
        let config = DashboardConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.vault_interval, Duration::from_secs(30));
        assert_eq!(config.player_interval, Duration::from_secs(15));
        assert!(config.contract.is_none());
    }

    #[test]
    fn dashboard_contract_needs_both_addresses() {
        let config = DashboardConfig::from_vars(&vars(&base())).unwrap();
        assert_eq!(
            config.contract.map(|c| c.vault_authority),
            Some("0xb0b".parse().unwrap())
        );
        let partial = DashboardConfig::from_vars(&vars(&[("CONTRACT_ADDRESS", "0x1")])).unwrap();
        assert!(partial.contract.is_none());
    }
}
