//! Prefix set reduction.
//!
//! Two distinct reductions with different guarantees:
//!
//! - [`merge_siblings`] is address-space-exact: it only ever replaces two
//!   present sibling halves with their supernet, so covered space never
//!   changes. This is the summarization mode behind `--summarize`.
//! - [`remove_subsumed`] keeps maximal coverage by dropping prefixes
//!   contained in wider ones. On a set with meaningful holes this widens
//!   the represented space, so it is only for sets where containment
//!   implies true redundancy (e.g. exclusion-engine output unioned across
//!   overlapping includes).
//!
//! Both outputs are sorted, pairwise non-containing and fixed points of
//! their own reduction.

use ipnet::Ipv4Net;

fn overlaps(a: &Ipv4Net, b: &Ipv4Net) -> bool {
    a.contains(b) || b.contains(a)
}

/// The common supernet of two exact siblings, if they are siblings.
fn sibling_supernet(a: &Ipv4Net, b: &Ipv4Net) -> Option<Ipv4Net> {
    if a.prefix_len() == 0 || a.prefix_len() != b.prefix_len() || a == b {
        return None;
    }
    let sup = a.supernet()?;
    (sup == b.supernet()?).then_some(sup)
}

/// One left-to-right merge pass over a sorted set.
fn merge_pass(nets: &[Ipv4Net]) -> Vec<Ipv4Net> {
    let mut out = Vec::with_capacity(nets.len());
    let mut i = 0;
    while i < nets.len() {
        let merged = if i + 1 < nets.len() {
            sibling_supernet(&nets[i], &nets[i + 1]).filter(|sup| {
                // Merging is only safe when nothing else straddles the
                // supernet boundary: every other element overlapping the
                // supernet must be fully inside it.
                nets.iter()
                    .enumerate()
                    .all(|(k, other)| k == i || k == i + 1 || !overlaps(sup, other) || sup.contains(other))
            })
        } else {
            None
        };
        match merged {
            Some(sup) => {
                out.push(sup);
                i += 2;
            }
            None => {
                out.push(nets[i]);
                i += 1;
            }
        }
    }
    out
}

/// Merge exact sibling pairs into their supernets until no merge applies.
///
/// Covered address space is preserved exactly: a merge combines two halves
/// that are both already present. The result is sorted and deduplicated.
pub fn merge_siblings(nets: &[Ipv4Net]) -> Vec<Ipv4Net> {
    let mut current: Vec<Ipv4Net> = nets.to_vec();
    current.sort();
    current.dedup();

    loop {
        // A merge can reproduce a supernet already present in the set, so
        // each pass dedups again. Output of a pass stays sorted.
        let mut next = merge_pass(&current);
        next.dedup();
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Drop every prefix contained in a wider one already kept.
///
/// Prefixes are visited widest first (ascending length), so any narrower
/// prefix inside a kept one is redundant for coverage. Lossy toward wider:
/// holes that existed between the narrow prefixes disappear.
pub fn remove_subsumed(nets: &[Ipv4Net]) -> Vec<Ipv4Net> {
    let mut by_width: Vec<Ipv4Net> = nets.to_vec();
    by_width.sort_by_key(|n| (n.prefix_len(), n.network()));

    let mut kept: Vec<Ipv4Net> = Vec::new();
    for net in by_width {
        if !kept.iter().any(|k| k.contains(&net)) {
            kept.push(net);
        }
    }
    kept.sort();
    kept
}
