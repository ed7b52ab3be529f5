//! Minimal text rendering for groupings and addresses.
//!
//! IPv4 renders as dotted decimal, IPv6 as uncompressed lowercase hex
//! segments, MAC as colon-separated two-digit hex. Multivalued divisions
//! render as `lower-upper`. A prefix block renders as its lower value with
//! `/prefix`; other prefixed values keep their ranges and append `/prefix`.

use core::fmt;

use crate::address::address::Address;
use crate::address::division::Division;
use crate::address::grouping::{Grouping, GroupingKind};

fn write_value(f: &mut fmt::Formatter<'_>, kind: GroupingKind, value: u64) -> fmt::Result {
    match kind {
        GroupingKind::Ipv4 => write!(f, "{}", value),
        GroupingKind::Mac => write!(f, "{:02x}", value),
        _ => write!(f, "{:x}", value),
    }
}

fn write_division(f: &mut fmt::Formatter<'_>, kind: GroupingKind, div: &Division, lower_only: bool) -> fmt::Result {
    write_value(f, kind, div.lower())?;
    if div.is_multiple() && !lower_only {
        f.write_str("-")?;
        write_value(f, kind, div.upper())?;
    }
    Ok(())
}

fn separator(kind: GroupingKind) -> &'static str {
    match kind {
        GroupingKind::Ipv4 => ".",
        _ => ":",
    }
}

/// Render a grouping, with an optional zone before the prefix length.
pub(crate) fn write_grouping(f: &mut fmt::Formatter<'_>, grouping: &Grouping, zone: Option<&str>) -> fmt::Result {
    let kind = grouping.kind();
    let lower_only = grouping.is_prefix_block();
    for (index, div) in grouping.divisions().iter().enumerate() {
        if index > 0 {
            f.write_str(separator(kind))?;
        }
        write_division(f, kind, div, lower_only)?;
    }
    if let Some(zone) = zone {
        write!(f, "%{}", zone)?;
    }
    if let Some(prefix_len) = grouping.prefix_len() {
        write!(f, "/{}", prefix_len)?;
    }
    Ok(())
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grouping(f, self, None)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grouping(f, self.section(), self.zone())
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use crate::address::address::Address;
    use crate::address::division::Division;
    use crate::address::grouping::{Grouping, GroupingKind};

    #[test]
    fn test_ipv4() {
        assert_eq!(Address::from(Ipv4Addr::new(192, 168, 1, 2)).to_string(), "192.168.1.2");
        let block = Address::from(Ipv4Addr::new(10, 1, 2, 3)).to_prefix_block_len(16);
        assert_eq!(block.to_string(), "10.1.0.0/16");
    }

    #[test]
    fn test_ranges() {
        let divisions = vec![
            Division::single(10, 8).unwrap(),
            Division::new(1, 3, 8).unwrap(),
            Division::single(0, 8).unwrap(),
            Division::single(0, 8).unwrap(),
        ];
        let g = Grouping::from_divisions(GroupingKind::Ipv4, divisions, None).unwrap();
        assert_eq!(g.to_string(), "10.1-3.0.0");
        assert_eq!(g.with_prefix_len(16).to_string(), "10.1-3.0.0/16");
    }

    #[test]
    fn test_ipv6_and_zone() {
        let addr = Address::from("fe80::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(addr.to_string(), "fe80:0:0:0:0:0:0:1");
        let scoped = addr.with_zone("eth0").unwrap().to_prefix_block_len(64);
        assert_eq!(scoped.to_string(), "fe80:0:0:0:0:0:0:0%eth0/64");
    }

    #[test]
    fn test_mac() {
        let mac = Address::mac([0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7]);
        assert_eq!(mac.to_string(), "00:1b:44:11:3a:b7");
    }

    #[test]
    fn test_zero() {
        assert_eq!(Grouping::zero().to_string(), "");
    }
}
