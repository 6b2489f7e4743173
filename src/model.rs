use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Region key used when a connection's VPC cannot be resolved.
pub const UNKNOWN_REGION: &str = "unknown";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid network document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

impl Protocol {
    pub const ALL: [Protocol; 2] = [Protocol::Tcp, Protocol::Udp];

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub vpc_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub account_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "addressIP", default)]
    pub address_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl Asset {
    /// Graph identity of the asset: its resource name, falling back to the address.
    pub fn node_id(&self) -> &str {
        non_empty(self.resource_name.as_deref()).unwrap_or(&self.address_ip)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortAssets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<Asset>,
}

/// Port map for a single protocol, keyed by the port as it appears in the document.
pub type PortMap = BTreeMap<String, PortAssets>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMap {
    #[serde(rename = "TCP", default, deserialize_with = "null_as_default")]
    pub tcp: PortMap,
    #[serde(rename = "UDP", default, deserialize_with = "null_as_default")]
    pub udp: PortMap,
}

impl ProtocolMap {
    pub fn get(&self, protocol: Protocol) -> &PortMap {
        match protocol {
            Protocol::Tcp => &self.tcp,
            Protocol::Udp => &self.udp,
        }
    }

    pub fn get_mut(&mut self, protocol: Protocol) -> &mut PortMap {
        match protocol {
            Protocol::Tcp => &mut self.tcp,
            Protocol::Udp => &mut self.udp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tcp.is_empty() && self.udp.is_empty()
    }

    /// Ports of one protocol, numeric ports first in ascending order, then the rest lexically.
    pub fn ports_in_order(&self, protocol: Protocol) -> Vec<(&str, &PortAssets)> {
        let mut ports: Vec<(&str, &PortAssets)> = self
            .get(protocol)
            .iter()
            .map(|(port, assets)| (port.as_str(), assets))
            .collect();
        ports.sort_by_key(|(port, _)| match port.parse::<u32>() {
            Ok(num) => (0u8, num, String::new()),
            Err(_) => (1u8, 0, (*port).to_string()),
        });
        ports
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficDirection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: ProtocolMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(rename = "PRIVATE_INBOUND", default, deserialize_with = "null_as_default")]
    pub private_inbound: TrafficDirection,
    #[serde(rename = "PRIVATE_OUTBOUND", default, deserialize_with = "null_as_default")]
    pub private_outbound: TrafficDirection,
}

impl Baseline {
    pub fn has_inbound(&self) -> bool {
        !self.private_inbound.ports.is_empty()
    }

    pub fn has_outbound(&self) -> bool {
        !self.private_outbound.ports.is_empty()
    }

    /// A connection is only drawn when some port map, in either direction, is non-empty.
    pub fn has_traffic(&self) -> bool {
        self.has_inbound() || self.has_outbound()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConnection {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub network_interface_id: String,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(rename = "resourceARN", default)]
    pub resource_arn: Option<String>,
    #[serde(default)]
    pub is_connected_to_threat: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_requesting_threat_domain: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub baseline: Baseline,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: i64,
}

impl VpcConnection {
    /// Graph identity of the connection: its resource name, falling back to the interface id.
    pub fn node_id(&self) -> &str {
        non_empty(self.resource_name.as_deref()).unwrap_or(&self.network_interface_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkModel {
    #[serde(default)]
    pub vpcs: Vec<Vpc>,
    #[serde(default)]
    pub vpc_connections: Vec<VpcConnection>,
}

impl NetworkModel {
    pub fn vpc_map(&self) -> HashMap<&str, &Vpc> {
        self.vpcs
            .iter()
            .map(|vpc| (vpc.vpc_id.as_str(), vpc))
            .collect()
    }
}

pub fn parse_network(input: &str) -> Result<NetworkModel, ModelError> {
    Ok(serde_json::from_str(input)?)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
