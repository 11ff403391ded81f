//! Resource types registered with the host

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// CloudStack resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    AffinityGroup,
    Disk,
    EgressFirewall,
    Firewall,
    Instance,
    IpAddress,
    LoadBalancerRule,
    Network,
    NetworkAcl,
    NetworkAclRule,
    Nic,
    PortForward,
    PrivateGateway,
    SecondaryIpAddress,
    SecurityGroup,
    SecurityGroupRule,
    SshKeypair,
    StaticNat,
    StaticRoute,
    Template,
    Vpc,
    VpnConnection,
    VpnCustomerGateway,
    VpnGateway,
}

impl ResourceType {
    pub const ALL: [ResourceType; 24] = [
        ResourceType::AffinityGroup,
        ResourceType::Disk,
        ResourceType::EgressFirewall,
        ResourceType::Firewall,
        ResourceType::Instance,
        ResourceType::IpAddress,
        ResourceType::LoadBalancerRule,
        ResourceType::Network,
        ResourceType::NetworkAcl,
        ResourceType::NetworkAclRule,
        ResourceType::Nic,
        ResourceType::PortForward,
        ResourceType::PrivateGateway,
        ResourceType::SecondaryIpAddress,
        ResourceType::SecurityGroup,
        ResourceType::SecurityGroupRule,
        ResourceType::SshKeypair,
        ResourceType::StaticNat,
        ResourceType::StaticRoute,
        ResourceType::Template,
        ResourceType::Vpc,
        ResourceType::VpnConnection,
        ResourceType::VpnCustomerGateway,
        ResourceType::VpnGateway,
    ];

    /// Type name as registered with the host (e.g. "cloudstack_network")
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::AffinityGroup => "cloudstack_affinity_group",
            ResourceType::Disk => "cloudstack_disk",
            ResourceType::EgressFirewall => "cloudstack_egress_firewall",
            ResourceType::Firewall => "cloudstack_firewall",
            ResourceType::Instance => "cloudstack_instance",
            ResourceType::IpAddress => "cloudstack_ipaddress",
            ResourceType::LoadBalancerRule => "cloudstack_loadbalancer_rule",
            ResourceType::Network => "cloudstack_network",
            ResourceType::NetworkAcl => "cloudstack_network_acl",
            ResourceType::NetworkAclRule => "cloudstack_network_acl_rule",
            ResourceType::Nic => "cloudstack_nic",
            ResourceType::PortForward => "cloudstack_port_forward",
            ResourceType::PrivateGateway => "cloudstack_private_gateway",
            ResourceType::SecondaryIpAddress => "cloudstack_secondary_ipaddress",
            ResourceType::SecurityGroup => "cloudstack_security_group",
            ResourceType::SecurityGroupRule => "cloudstack_security_group_rule",
            ResourceType::SshKeypair => "cloudstack_ssh_keypair",
            ResourceType::StaticNat => "cloudstack_static_nat",
            ResourceType::StaticRoute => "cloudstack_static_route",
            ResourceType::Template => "cloudstack_template",
            ResourceType::Vpc => "cloudstack_vpc",
            ResourceType::VpnConnection => "cloudstack_vpn_connection",
            ResourceType::VpnCustomerGateway => "cloudstack_vpn_customer_gateway",
            ResourceType::VpnGateway => "cloudstack_vpn_gateway",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResourceType::AffinityGroup => "Affinity group for instance placement",
            ResourceType::Disk => "Data disk volume",
            ResourceType::EgressFirewall => "Egress firewall rules of a network",
            ResourceType::Firewall => "Ingress firewall rules of a public IP",
            ResourceType::Instance => "Virtual machine instance",
            ResourceType::IpAddress => "Acquired public IP address",
            ResourceType::LoadBalancerRule => "Load balancer rule",
            ResourceType::Network => "Guest network",
            ResourceType::NetworkAcl => "VPC network ACL list",
            ResourceType::NetworkAclRule => "Rules of a VPC network ACL list",
            ResourceType::Nic => "Additional NIC of an instance",
            ResourceType::PortForward => "Port forwarding rules of a public IP",
            ResourceType::PrivateGateway => "VPC private gateway",
            ResourceType::SecondaryIpAddress => "Secondary IP address of a NIC",
            ResourceType::SecurityGroup => "Security group",
            ResourceType::SecurityGroupRule => "Rules of a security group",
            ResourceType::SshKeypair => "SSH key pair",
            ResourceType::StaticNat => "Static NAT between a public IP and an instance",
            ResourceType::StaticRoute => "VPC static route",
            ResourceType::Template => "Registered template",
            ResourceType::Vpc => "Virtual private cloud",
            ResourceType::VpnConnection => "Site-to-site VPN connection",
            ResourceType::VpnCustomerGateway => "Site-to-site VPN customer gateway",
            ResourceType::VpnGateway => "Site-to-site VPN gateway of a VPC",
        }
    }

    /// API command that reads objects of this type
    pub fn list_command(&self) -> &'static str {
        match self {
            ResourceType::AffinityGroup => "listAffinityGroups",
            ResourceType::Disk => "listVolumes",
            ResourceType::EgressFirewall => "listEgressFirewallRules",
            ResourceType::Firewall => "listFirewallRules",
            ResourceType::Instance => "listVirtualMachines",
            ResourceType::IpAddress | ResourceType::StaticNat => "listPublicIpAddresses",
            ResourceType::LoadBalancerRule => "listLoadBalancerRules",
            ResourceType::Network => "listNetworks",
            ResourceType::NetworkAcl => "listNetworkACLLists",
            ResourceType::NetworkAclRule => "listNetworkACLs",
            ResourceType::Nic | ResourceType::SecondaryIpAddress => "listNics",
            ResourceType::PortForward => "listPortForwardingRules",
            ResourceType::PrivateGateway => "listPrivateGateways",
            ResourceType::SecurityGroup | ResourceType::SecurityGroupRule => "listSecurityGroups",
            ResourceType::SshKeypair => "listSSHKeyPairs",
            ResourceType::StaticRoute => "listStaticRoutes",
            ResourceType::Template => "listTemplates",
            ResourceType::Vpc => "listVPCs",
            ResourceType::VpnConnection => "listVpnConnections",
            ResourceType::VpnCustomerGateway => "listVpnCustomerGateways",
            ResourceType::VpnGateway => "listVpnGateways",
        }
    }

    /// Key of the object array in the list response
    pub fn item_key(&self) -> &'static str {
        match self {
            ResourceType::AffinityGroup => "affinitygroup",
            ResourceType::Disk => "volume",
            ResourceType::EgressFirewall | ResourceType::Firewall => "firewallrule",
            ResourceType::Instance => "virtualmachine",
            ResourceType::IpAddress | ResourceType::StaticNat => "publicipaddress",
            ResourceType::LoadBalancerRule => "loadbalancerrule",
            ResourceType::Network => "network",
            ResourceType::NetworkAcl => "networkacllist",
            ResourceType::NetworkAclRule => "networkacl",
            ResourceType::Nic | ResourceType::SecondaryIpAddress => "nic",
            ResourceType::PortForward => "portforwardingrule",
            ResourceType::PrivateGateway => "privategateway",
            ResourceType::SecurityGroup | ResourceType::SecurityGroupRule => "securitygroup",
            ResourceType::SshKeypair => "sshkeypair",
            ResourceType::StaticRoute => "staticroute",
            ResourceType::Template => "template",
            ResourceType::Vpc => "vpc",
            ResourceType::VpnConnection => "vpnconnection",
            ResourceType::VpnCustomerGateway => "vpncustomergateway",
            ResourceType::VpnGateway => "vpngateway",
        }
    }

    /// Parameters the list command always needs
    pub fn list_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResourceType::StaticNat => &[("isstaticnat", "true")],
            ResourceType::Template => &[("templatefilter", "self")],
            _ => &[],
        }
    }

    /// Whether the list command needs a parent `virtualmachineid`
    pub fn requires_instance(&self) -> bool {
        matches!(self, ResourceType::Nic | ResourceType::SecondaryIpAddress)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResourceType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ProviderError::ResourceTypeNotFound(s.to_string()))
    }
}

/// Resource types registered by a provider, indexed by type name
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<&'static str, ResourceType>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every CloudStack resource type
    pub fn cloudstack() -> Self {
        let mut registry = Self::new();
        for resource_type in ResourceType::ALL {
            registry.register(resource_type);
        }
        registry
    }

    pub fn register(&mut self, resource_type: ResourceType) {
        self.resources.insert(resource_type.name(), resource_type);
    }

    pub fn get(&self, name: &str) -> Result<ResourceType> {
        self.resources
            .get(name)
            .copied()
            .ok_or_else(|| ProviderError::ResourceTypeNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Registered types, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.resources.values().copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
