//! Exact subtraction of exclude networks from include networks.
//!
//! The result of [`subtract`] is the maximal prefix-aligned cover of the
//! include network minus every exclude contained in it: recursive bisection
//! over the implicit binary trie, depth bounded by `32 - prefix_len`.

use ipnet::Ipv4Net;
use std::collections::BTreeSet;

/// Subtract `excludes` from `network`, returning an exact aligned cover of
/// the remaining address space.
///
/// Every exclude must be contained in (or equal to) `network`; callers
/// filter by containment first ([`subtract_all`] does). At each level the
/// two halves partition the relevant excludes between them and each half
/// recurses with its full subset, so co-located excludes in the same half
/// are all honored.
pub fn subtract(network: Ipv4Net, excludes: &[Ipv4Net]) -> Vec<Ipv4Net> {
    if excludes.iter().any(|ex| *ex == network) {
        return Vec::new();
    }
    if !excludes.iter().any(|ex| network.contains(ex)) {
        return vec![network];
    }

    // A /32 has no strict subnets, so a relevant exclude below always lets
    // the split succeed.
    let halves = match network.subnets(network.prefix_len() + 1) {
        Ok(halves) => halves,
        Err(_) => return vec![network],
    };

    let mut cover = Vec::new();
    for half in halves {
        let inside: Vec<Ipv4Net> = excludes
            .iter()
            .copied()
            .filter(|ex| half.contains(ex))
            .collect();
        if inside.is_empty() {
            cover.push(half);
        } else {
            cover.extend(subtract(half, &inside));
        }
    }
    cover
}

/// Subtract a set of excludes from every include network independently and
/// union the covers.
///
/// For each include only the excludes strictly contained in it (or equal to
/// it) are passed down; wider or disjoint excludes are irrelevant to that
/// include. Two overlapping includes are processed independently, so the
/// union may contain nested covers until an aggregation pass runs.
pub fn subtract_all(includes: &[Ipv4Net], excludes: &[Ipv4Net]) -> BTreeSet<Ipv4Net> {
    let mut result = BTreeSet::new();
    for network in includes {
        let relevant: Vec<Ipv4Net> = excludes
            .iter()
            .copied()
            .filter(|ex| network.contains(ex))
            .collect();
        result.extend(subtract(*network, &relevant));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    fn nets(list: &[&str]) -> Vec<Ipv4Net> {
        list.iter().map(|s| net(s)).collect()
    }

    #[test]
    fn test_no_excludes_is_identity() {
        assert_eq!(subtract(net("10.0.0.0/24"), &[]), nets(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_full_exclusion_is_empty() {
        let n = net("10.0.0.0/24");
        assert!(subtract(n, &[n]).is_empty());
    }

    #[test]
    fn test_single_exclude_leaves_aligned_cover() {
        let result = subtract(net("10.0.0.0/24"), &nets(&["10.0.0.0/26"]));
        assert_eq!(result, nets(&["10.0.0.64/26", "10.0.0.128/25"]));
    }

    #[test]
    fn test_exactness_example() {
        // 0-63 and 128-255 excluded, exactly 64-127 remains.
        let result = subtract(
            net("10.0.0.0/24"),
            &nets(&["10.0.0.0/26", "10.0.0.128/25"]),
        );
        assert_eq!(result, nets(&["10.0.0.64/26"]));
    }

    #[test]
    fn test_multiple_excludes_in_same_half() {
        // Regression: both narrow excludes fall in the low half and both
        // must be removed, not just the first one found.
        let result = subtract(
            net("10.0.0.0/24"),
            &nets(&["10.0.0.0/28", "10.0.0.16/28"]),
        );
        assert_eq!(
            result,
            nets(&["10.0.0.32/27", "10.0.0.64/26", "10.0.0.128/25"])
        );
    }

    #[test]
    fn test_single_host_exclude() {
        let result = subtract(net("192.168.0.0/30"), &nets(&["192.168.0.3/32"]));
        assert_eq!(result, nets(&["192.168.0.0/31", "192.168.0.2/32"]));
    }

    #[test]
    fn test_output_is_pairwise_non_overlapping() {
        let result = subtract(
            net("10.0.0.0/16"),
            &nets(&["10.0.1.0/24", "10.0.1.128/25", "10.0.200.0/27", "10.0.200.4/30"]),
        );
        for (i, a) in result.iter().enumerate() {
            for b in result.iter().skip(i + 1) {
                assert!(!a.contains(b) && !b.contains(a), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_subtract_all_filters_irrelevant_excludes() {
        // An exclude wider than the include and a disjoint one are ignored.
        let result = subtract_all(
            &nets(&["10.0.0.0/24"]),
            &nets(&["10.0.0.0/8", "172.16.0.0/12"]),
        );
        assert_eq!(result.into_iter().collect::<Vec<_>>(), nets(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_subtract_all_processes_includes_independently() {
        let result = subtract_all(
            &nets(&["10.0.0.0/25", "10.0.0.128/25"]),
            &nets(&["10.0.0.128/26"]),
        );
        // Mergeable halves are not merged here; that is the aggregator's job.
        assert_eq!(
            result.into_iter().collect::<Vec<_>>(),
            nets(&["10.0.0.0/25", "10.0.0.192/26"])
        );
    }

    #[test]
    fn test_subtract_all_unions_duplicates() {
        let result = subtract_all(
            &nets(&["10.0.0.0/24", "10.0.0.0/24"]),
            &nets(&["10.0.0.0/25"]),
        );
        assert_eq!(
            result.into_iter().collect::<Vec<_>>(),
            nets(&["10.0.0.128/25"])
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::net::Ipv4Addr;

    /// Inclusive u32 address ranges covered by a set of networks, merged.
    fn covered(nets: &[Ipv4Net]) -> Vec<(u32, u32)> {
        let mut ranges: Vec<(u32, u32)> = nets
            .iter()
            .map(|n| (u32::from(n.network()), u32::from(n.broadcast())))
            .collect();
        ranges.sort();
        let mut merged: Vec<(u32, u32)> = Vec::new();
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    fn network_strategy() -> impl Strategy<Value = Ipv4Net> {
        (any::<u32>(), 4u8..=24).prop_map(|(addr, len)| {
            Ipv4Net::new(Ipv4Addr::from(addr), len).unwrap().trunc()
        })
    }

    /// A network plus excludes each contained in it by construction.
    fn network_with_excludes() -> impl Strategy<Value = (Ipv4Net, Vec<Ipv4Net>)> {
        network_strategy().prop_flat_map(|net| {
            let excludes = prop::collection::vec(
                (any::<u32>(), 0u8..=8).prop_map(move |(seed, extra)| {
                    let len = (net.prefix_len() + extra).min(32);
                    let span = 32 - net.prefix_len();
                    let offset = if span == 0 { 0 } else { seed % (1u32 << span) };
                    let addr = u32::from(net.network()) | offset;
                    Ipv4Net::new(Ipv4Addr::from(addr), len).unwrap().trunc()
                }),
                0..6,
            );
            (Just(net), excludes)
        })
    }

    proptest! {
        /// The cover plus the excludes reconstructs the include exactly, and
        /// the cover is disjoint from every exclude.
        #[test]
        fn prop_subtract_exact((net, excludes) in network_with_excludes()) {
            let result = subtract(net, &excludes);

            for r in &result {
                prop_assert!(net.contains(r));
                for ex in &excludes {
                    prop_assert!(!r.contains(ex) && !ex.contains(r));
                }
            }

            let mut all: Vec<Ipv4Net> = result.clone();
            all.extend(excludes.iter().copied());
            prop_assert_eq!(
                covered(&all),
                vec![(u32::from(net.network()), u32::from(net.broadcast()))]
            );
        }

        /// No two cover elements contain one another.
        #[test]
        fn prop_subtract_non_overlapping((net, excludes) in network_with_excludes()) {
            let result = subtract(net, &excludes);
            for (i, a) in result.iter().enumerate() {
                for b in result.iter().skip(i + 1) {
                    prop_assert!(!a.contains(b) && !b.contains(a));
                }
            }
        }
    }
}
