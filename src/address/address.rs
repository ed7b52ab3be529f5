//! Addresses: a family-tagged grouping plus an optional IPv6 zone.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};

use crate::address::division::Division;
use crate::address::grouping::{AddressCount, Grouping, GroupingKind};
use crate::constants::BitCount;
use crate::error::{AddressValueError, IncompatibleAddressError};

/// Address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Mac,
}

impl AddressFamily {
    /// Grouping kind carrying this family.
    #[inline]
    pub fn kind(self) -> GroupingKind {
        match self {
            AddressFamily::Ipv4 => GroupingKind::Ipv4,
            AddressFamily::Ipv6 => GroupingKind::Ipv6,
            AddressFamily::Mac => GroupingKind::Mac,
        }
    }
}

/// An IPv4, IPv6 or MAC address, possibly multivalued.
///
/// Two addresses are equal only when both the sections and the zones are
/// equal, so link-local addresses in different zones never compare equal
/// and never contain one another.
///
/// # Example
/// ```rust
/// use std::net::Ipv4Addr;
/// use addr_trie::Address;
///
/// let net: ipnet::Ipv4Net = "10.1.0.0/16".parse().unwrap();
/// let block = Address::from(net);
/// assert!(block.is_single_prefix_block());
/// assert!(block.contains(&Address::from(Ipv4Addr::new(10, 1, 2, 3))));
/// assert_eq!(block.to_string(), "10.1.0.0/16");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    section: Grouping,
    zone: Option<Arc<str>>,
}

impl Address {
    /// Wrap a family grouping.
    ///
    /// # Errors
    /// - [`AddressValueError::NotAnAddress`] when the grouping kind is not
    ///   IPv4, IPv6 or MAC
    /// - [`AddressValueError::ZoneNotPermitted`] for a zone on a non-IPv6 section
    pub fn new(section: Grouping, zone: Option<&str>) -> Result<Self, AddressValueError> {
        match section.kind() {
            GroupingKind::Ipv4 | GroupingKind::Mac if zone.is_some() => Err(AddressValueError::ZoneNotPermitted),
            GroupingKind::Ipv4 | GroupingKind::Ipv6 | GroupingKind::Mac => Ok(Address {
                section,
                zone: zone.map(Arc::from),
            }),
            kind => Err(AddressValueError::NotAnAddress(kind.name())),
        }
    }

    /// Single-valued 48-bit MAC address.
    pub fn mac(bytes: [u8; 6]) -> Self {
        Address {
            section: Grouping::build(
                GroupingKind::Mac,
                bytes.iter().map(|&byte| crate::address::intern::byte_division(byte)).collect(),
                None,
            ),
            zone: None,
        }
    }

    /// Same section with the given zone.
    pub fn with_zone(&self, zone: &str) -> Result<Self, AddressValueError> {
        Self::new(self.section.clone(), Some(zone))
    }

    /// Same section with no zone.
    pub fn without_zone(&self) -> Self {
        Address {
            section: self.section.clone(),
            zone: None,
        }
    }

    /// Wrap a section derived from this address's own section, keeping the zone.
    #[inline]
    fn derive(&self, section: Grouping) -> Self {
        Address {
            section,
            zone: self.zone.clone(),
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self.section.kind() {
            GroupingKind::Ipv4 => AddressFamily::Ipv4,
            GroupingKind::Ipv6 => AddressFamily::Ipv6,
            _ => AddressFamily::Mac,
        }
    }

    #[inline]
    pub fn section(&self) -> &Grouping {
        &self.section
    }

    #[inline]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    #[inline]
    pub fn divisions(&self) -> &[Arc<Division>] {
        self.section.divisions()
    }

    #[inline]
    pub fn bit_count(&self) -> BitCount {
        self.section.bit_count()
    }

    #[inline]
    pub fn prefix_len(&self) -> Option<BitCount> {
        self.section.prefix_len()
    }

    #[inline]
    pub fn is_multiple(&self) -> bool {
        self.section.is_multiple()
    }

    pub fn count(&self) -> AddressCount {
        self.section.count()
    }

    pub fn value(&self) -> u128 {
        self.section.value()
    }

    pub fn upper_value(&self) -> u128 {
        self.section.upper_value()
    }

    pub fn bytes(&self) -> Result<Vec<u8>, IncompatibleAddressError> {
        self.section.bytes()
    }

    pub fn upper_bytes(&self) -> Result<Vec<u8>, IncompatibleAddressError> {
        self.section.upper_bytes()
    }

    pub fn is_full_range(&self) -> bool {
        self.section.is_full_range()
    }

    pub fn is_sequential(&self) -> bool {
        self.section.is_sequential()
    }

    pub fn is_prefix_block(&self) -> bool {
        self.section.is_prefix_block()
    }

    pub fn is_single_prefix_block(&self) -> bool {
        self.section.is_single_prefix_block()
    }

    pub fn contains_prefix_block(&self, prefix_len: BitCount) -> bool {
        self.section.contains_prefix_block(prefix_len)
    }

    pub fn contains_single_prefix_block(&self, prefix_len: BitCount) -> bool {
        self.section.contains_single_prefix_block(prefix_len)
    }

    pub fn min_prefix_len_for_block(&self) -> BitCount {
        self.section.min_prefix_len_for_block()
    }

    pub fn prefix_len_for_single_block(&self) -> Option<BitCount> {
        self.section.prefix_len_for_single_block()
    }

    /// Whether every value of `other` is in this address. Zones must match.
    pub fn contains(&self, other: &Address) -> bool {
        self.zone == other.zone && self.section.contains(&other.section)
    }

    /// Whether the two addresses share a value. Zones must match.
    pub fn overlaps(&self, other: &Address) -> bool {
        self.zone == other.zone && self.section.overlaps(&other.section)
    }

    /// Whether this address's network bits contain those of `other`.
    pub fn prefix_contains(&self, other: &Address) -> bool {
        self.zone == other.zone && self.section.prefix_contains(&other.section)
    }

    pub fn with_prefix_len(&self, prefix_len: BitCount) -> Address {
        self.derive(self.section.with_prefix_len(prefix_len))
    }

    pub fn without_prefix_len(&self) -> Address {
        self.derive(self.section.without_prefix_len())
    }

    pub fn to_prefix_block(&self) -> Address {
        self.derive(self.section.to_prefix_block())
    }

    pub fn to_prefix_block_len(&self, prefix_len: BitCount) -> Address {
        self.derive(self.section.to_prefix_block_len(prefix_len))
    }

    pub fn assign_min_prefix_for_block(&self) -> Address {
        self.derive(self.section.assign_min_prefix_for_block())
    }

    pub fn assign_prefix_for_single_block(&self) -> Option<Address> {
        self.section
            .assign_prefix_for_single_block()
            .map(|section| self.derive(section))
    }

    pub fn to_single_prefix_block_or_address(&self) -> Option<Address> {
        self.section
            .to_single_prefix_block_or_address()
            .map(|section| self.derive(section))
    }

    pub fn lower(&self) -> Address {
        self.derive(self.section.lower())
    }

    pub fn upper(&self) -> Address {
        self.derive(self.section.upper())
    }

    pub fn to_max_lower(&self) -> Address {
        self.derive(self.section.to_max_lower())
    }

    pub fn to_min_upper(&self) -> Address {
        self.derive(self.section.to_min_upper())
    }

    pub fn reverse_segments(&self) -> Address {
        self.derive(self.section.reverse_segments())
    }

    pub fn reverse_bits(&self, per_byte: bool) -> Result<Address, IncompatibleAddressError> {
        Ok(self.derive(self.section.reverse_bits(per_byte)?))
    }

    pub fn reverse_bytes(&self) -> Result<Address, IncompatibleAddressError> {
        Ok(self.derive(self.section.reverse_bytes()?))
    }

    pub fn span_with_prefix_blocks(&self) -> Result<Vec<Address>, IncompatibleAddressError> {
        Ok(self
            .section
            .span_with_prefix_blocks()?
            .into_iter()
            .map(|section| self.derive(section))
            .collect())
    }

    /// The lower value as a std IP address, for IP families.
    pub fn to_ip_addr(&self) -> Option<IpAddr> {
        match self.family() {
            AddressFamily::Ipv4 => Some(IpAddr::V4(Ipv4Addr::from(self.value() as u32))),
            AddressFamily::Ipv6 => Some(IpAddr::V6(Ipv6Addr::from(self.value()))),
            AddressFamily::Mac => None,
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address {
            section: Grouping::ipv4(addr.octets()),
            zone: None,
        }
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address {
            section: Grouping::ipv6(addr.segments()),
            zone: None,
        }
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(addr) => addr.into(),
            IpAddr::V6(addr) => addr.into(),
        }
    }
}

/// Networks become the prefix block of their prefix length; host bits in
/// the network address are discarded.
impl From<Ipv4Net> for Address {
    fn from(net: Ipv4Net) -> Self {
        Address::from(net.addr()).to_prefix_block_len(net.prefix_len())
    }
}

impl From<Ipv6Net> for Address {
    fn from(net: Ipv6Net) -> Self {
        Address::from(net.addr()).to_prefix_block_len(net.prefix_len())
    }
}

impl From<IpNet> for Address {
    fn from(net: IpNet) -> Self {
        match net {
            IpNet::V4(net) => net.into(),
            IpNet::V6(net) => net.into(),
        }
    }
}

impl TryFrom<Grouping> for Address {
    type Error = AddressValueError;

    fn try_from(section: Grouping) -> Result<Self, Self::Error> {
        Address::new(section, None)
    }
}

impl core::fmt::Debug for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(text: &str) -> Address {
        text.parse::<Ipv4Addr>().unwrap().into()
    }

    fn net(text: &str) -> Address {
        text.parse::<IpNet>().unwrap().into()
    }

    #[test]
    fn test_new_checks_kind_and_zone() {
        let section = Grouping::ipv6([0xfe80, 0, 0, 0, 0, 0, 0, 1]);
        let scoped = Address::new(section, Some("eth0")).unwrap();
        assert_eq!(scoped.zone(), Some("eth0"));
        assert_eq!(scoped.family(), AddressFamily::Ipv6);

        assert_eq!(
            Address::new(Grouping::ipv4([1, 2, 3, 4]), Some("eth0")),
            Err(AddressValueError::ZoneNotPermitted)
        );
        assert_eq!(
            Address::try_from(Grouping::zero()),
            Err(AddressValueError::NotAnAddress("zero"))
        );
    }

    #[test]
    fn test_zone_equality() {
        let base = Address::from("fe80::1".parse::<Ipv6Addr>().unwrap());
        let eth0 = base.with_zone("eth0").unwrap();
        let eth1 = base.with_zone("eth1").unwrap();
        assert_ne!(eth0, eth1);
        assert!(!eth0.contains(&eth1));
        assert!(!eth0.overlaps(&eth1));
        assert_eq!(eth0.without_zone(), base);
        assert_eq!(eth0.to_prefix_block_len(64).zone(), Some("eth0"));
    }

    #[test]
    fn test_from_net() {
        let block = net("192.168.1.77/24");
        assert_eq!(block.lower(), v4("192.168.1.0").with_prefix_len(24));
        assert_eq!(block.upper_value(), 0xc0a8_01ff);
        assert_eq!(block.prefix_len(), Some(24));
        assert!(block.is_single_prefix_block());

        let v6 = net("2001:db8::/32");
        assert_eq!(v6.family(), AddressFamily::Ipv6);
        assert_eq!(v6.prefix_len_for_single_block(), Some(32));
    }

    #[test]
    fn test_mac() {
        let mac = Address::mac([0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7]);
        assert_eq!(mac.family(), AddressFamily::Mac);
        assert_eq!(mac.bit_count(), 48);
        assert_eq!(mac.to_ip_addr(), None);
    }

    #[test]
    fn test_to_ip_addr() {
        assert_eq!(
            v4("10.1.2.3").to_ip_addr(),
            Some("10.1.2.3".parse().unwrap())
        );
        assert_eq!(
            net("2001:db8::/32").to_ip_addr(),
            Some("2001:db8::".parse().unwrap())
        );
    }

    #[test]
    fn test_containment() {
        let outer = net("10.0.0.0/8");
        assert!(outer.contains(&net("10.1.0.0/16")));
        assert!(outer.contains(&v4("10.200.3.4")));
        assert!(!net("10.1.0.0/16").contains(&outer));
        assert!(outer.prefix_contains(&v4("10.0.0.1")));
    }
}
