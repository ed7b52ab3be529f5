//! Routing table example for addr-trie.
//!
//! Builds a small IPv4 routing table, resolves next hops by longest-prefix
//! match and walks the table in the different traversal orders.
//!
//! Run with `RUST_LOG=addr_trie=debug` to see trie restructuring.

use std::net::Ipv4Addr;

use addr_trie::{Address, Trie};
use tracing_subscriber::EnvFilter;

fn net(text: &str) -> Address {
    Address::from(text.parse::<ipnet::IpNet>().expect("valid network literal"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== addr-trie - Routing Table Example ===\n");

    let mut routes: Trie<Address, &str> = Trie::new();
    routes.put(net("0.0.0.0/0"), "upstream");
    routes.put(net("10.0.0.0/8"), "core");
    routes.put(net("10.1.0.0/16"), "branch-a");
    routes.put(net("10.1.2.0/24"), "lab");
    routes.put(net("10.200.0.0/16"), "branch-b");
    routes.put(net("192.168.0.0/16"), "office");
    println!("Routes: {}  (nodes: {})", routes.len(), routes.node_count());

    println!("\nTree:");
    print!("{}", routes.to_tree_string(true, true));

    println!("\nNext hops:");
    for dest in [
        Ipv4Addr::new(10, 1, 2, 3),
        Ipv4Addr::new(10, 1, 9, 9),
        Ipv4Addr::new(10, 77, 0, 1),
        Ipv4Addr::new(192, 168, 4, 4),
        Ipv4Addr::new(8, 8, 8, 8),
    ] {
        let addr = Address::from(dest);
        let hop = routes
            .longest_prefix_match_node(&addr)
            .map(|node| format!("{} via {}", node.key(), node.value().copied().unwrap_or("-")));
        println!("  {:<15} -> {}", dest, hop.unwrap_or_else(|| "unreachable".to_string()));
    }

    println!("\nContaining routes for 10.1.2.3:");
    for node in routes.elements_containing(&Address::from(Ipv4Addr::new(10, 1, 2, 3))) {
        println!("  {}", node.key());
    }

    println!("\nSorted order:");
    for (key, value) in &routes {
        println!("  {:<16} {:?}", key.to_string(), value);
    }

    println!("\nLargest blocks first:");
    for node in routes.block_size_node_iter(true, true) {
        println!("  {}", node.key());
    }

    println!("\nContained-first (specific routes before aggregates):");
    for node in routes.contained_first_iter(true, true) {
        println!("  {}", node.key());
    }

    println!("\nWithdrawing 10.1.0.0/16 and everything inside it");
    if let Some(withdrawn) = routes.remove_elements_contained_by(&net("10.1.0.0/16")) {
        println!("  withdrawn {} routes", withdrawn.len());
    }
    let addr = Address::from(Ipv4Addr::new(10, 1, 2, 3));
    println!(
        "  10.1.2.3 now resolves to {:?}",
        routes.longest_prefix_match(&addr).map(|key| key.to_string())
    );

    println!("\n=== Example completed successfully ===");
}
