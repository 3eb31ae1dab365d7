use crate::models::{Category, Prompt};
use std::collections::{HashMap, HashSet};

/// Grouping key for prompt buckets. A dedicated enum avoids ever colliding
/// the sentinel with a real category id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Bucket {
    Category(String),
    Uncategorized,
}

/// Forest view over a flat category list.
///
/// Roots and children lists preserve input (arrival) order. A category with a
/// dangling non-empty `parent_id` lands in a children list keyed by an id no
/// one renders, so it is unreachable from the roots walk; that is accepted
/// behavior, surfaced separately via [`unreachable_ids`].
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CategoryForest {
    pub roots: Vec<Category>,
    pub children: HashMap<String, Vec<Category>>,
}

impl CategoryForest {
    pub fn children_of(&self, id: &str) -> &[Category] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Single O(n) partition pass: roots vs. children-by-parent-id.
pub(crate) fn build_forest(categories: &[Category]) -> CategoryForest {
    let mut forest = CategoryForest::default();
    for c in categories {
        match c.parent_ref() {
            None => forest.roots.push(c.clone()),
            Some(p) => forest
                .children
                .entry(p.to_string())
                .or_default()
                .push(c.clone()),
        }
    }
    forest
}

/// Partition prompts into per-category buckets plus the uncategorized bucket.
///
/// Every known category gets a bucket even when empty. A prompt whose
/// `category_id` matches no known category fails open into `Uncategorized`.
pub(crate) fn group_by_category(
    prompts: &[Prompt],
    categories: &[Category],
) -> HashMap<Bucket, Vec<Prompt>> {
    let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();

    let mut buckets: HashMap<Bucket, Vec<Prompt>> = HashMap::new();
    for c in categories {
        buckets.entry(Bucket::Category(c.id.clone())).or_default();
    }
    buckets.entry(Bucket::Uncategorized).or_default();

    for p in prompts {
        let key = match p.category_ref() {
            Some(cid) if known.contains(cid) => Bucket::Category(cid.to_string()),
            _ => Bucket::Uncategorized,
        };
        buckets.entry(key).or_default().push(p.clone());
    }

    buckets
}

/// Ancestor ids that must be marked expanded so `target_id` is visible in the
/// nested tree. Walks `parent_id` pointers upward; the visited set bounds the
/// walk so a cyclic parent chain terminates instead of hanging.
pub(crate) fn ancestors_to_expand(target_id: &str, categories: &[Category]) -> HashSet<String> {
    let by_id: HashMap<&str, &Category> =
        categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut out: HashSet<String> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(target_id);

    let mut cursor = by_id.get(target_id).and_then(|c| c.parent_ref());
    while let Some(pid) = cursor {
        if !visited.insert(pid) {
            // Cycle: abort on repeat. What we collected so far is still useful.
            break;
        }
        let Some(parent) = by_id.get(pid) else {
            // Unresolved parent ends the chain.
            break;
        };
        out.insert(pid.to_string());
        cursor = parent.parent_ref();
    }

    out
}

/// Resolved nesting depth per category, with cycle tagging.
///
/// Each id is resolved at most once (memoized). A node encountered twice on
/// the current resolution path marks every node on that path cyclic; cyclic
/// nodes get no depth and the sidebar renders them flat instead of recursing.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DepthMap {
    depths: HashMap<String, usize>,
    cyclic: HashSet<String>,
}

impl DepthMap {
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.depths.get(id).copied()
    }

    pub fn is_cyclic(&self, id: &str) -> bool {
        self.cyclic.contains(id)
    }

    pub fn cyclic_ids(&self) -> &HashSet<String> {
        &self.cyclic
    }
}

pub(crate) fn resolve_depths(categories: &[Category]) -> DepthMap {
    let by_id: HashMap<&str, &Category> =
        categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut map = DepthMap::default();

    for c in categories {
        if map.depths.contains_key(c.id.as_str()) || map.cyclic.contains(c.id.as_str()) {
            continue;
        }

        // Walk up, recording the path until we hit a memoized node, a root,
        // a dangling parent, or a repeat (cycle).
        let mut path: Vec<&str> = vec![c.id.as_str()];
        let mut on_path: HashSet<&str> = HashSet::new();
        on_path.insert(c.id.as_str());

        let mut base_depth: Option<usize> = None;
        let mut cyclic = false;

        let mut cursor = c.parent_ref();
        loop {
            let Some(pid) = cursor else {
                // Root (or normalized-empty parent): chain bottoms out at depth 0.
                base_depth = Some(0);
                break;
            };

            if on_path.contains(pid) || map.cyclic.contains(pid) {
                cyclic = true;
                break;
            }

            if let Some(d) = map.depths.get(pid) {
                base_depth = Some(d + 1);
                break;
            }

            let Some(parent) = by_id.get(pid) else {
                // Dangling parent: the subtree is unreachable from the roots
                // walk; assign depth 0 so the value is at least well-defined.
                base_depth = Some(0);
                break;
            };

            path.push(pid);
            on_path.insert(pid);
            cursor = parent.parent_ref();
        }

        if cyclic {
            for id in path {
                map.cyclic.insert(id.to_string());
            }
        } else if let Some(base) = base_depth {
            // The path is bottom-up; depths assign top-down.
            for (i, id) in path.iter().rev().enumerate() {
                map.depths.insert(id.to_string(), base + i);
            }
        }
    }

    map
}

/// Ids that the nested tree walk can never reach: members of a cyclic parent
/// group, or descendants of a dangling parent. The sidebar lists these flat.
pub(crate) fn unreachable_ids(categories: &[Category]) -> HashSet<String> {
    let forest = build_forest(categories);
    let mut reachable: HashSet<String> = HashSet::new();

    let mut stack: Vec<&Category> = forest.roots.iter().collect();
    while let Some(c) = stack.pop() {
        if !reachable.insert(c.id.clone()) {
            continue;
        }
        stack.extend(forest.children_of(&c.id).iter());
    }

    categories
        .iter()
        .filter(|c| !reachable.contains(&c.id))
        .map(|c| c.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            color: None,
            icon: None,
            parent_id: parent.map(|p| p.to_string()),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn prompt(id: &str, category: Option<&str>) -> Prompt {
        Prompt {
            id: id.to_string(),
            title: format!("prompt {id}"),
            content: String::new(),
            description: None,
            is_favorite: false,
            tags: None,
            category_id: category.map(|c| c.to_string()),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn forest_roots_are_exactly_parentless_categories() {
        let cats = vec![
            cat("1", "Work", None),
            cat("2", "Code", Some("1")),
            cat("3", "Home", Some("")),
            cat("4", "Chores", Some("3")),
        ];
        let forest = build_forest(&cats);

        let root_ids: Vec<&str> = forest.roots.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(root_ids, ["1", "3"]);
        assert_eq!(forest.children_of("1").len(), 1);
        assert_eq!(forest.children_of("1")[0].id, "2");
        assert_eq!(forest.children_of("3")[0].id, "4");
    }

    #[test]
    fn forest_every_category_in_at_most_one_bucket() {
        let cats = vec![
            cat("1", "Work", None),
            cat("2", "Code", Some("1")),
            cat("3", "Lost", Some("missing")),
        ];
        let forest = build_forest(&cats);

        let mut seen: HashMap<String, usize> = HashMap::new();
        for c in &forest.roots {
            *seen.entry(c.id.clone()).or_default() += 1;
        }
        for kids in forest.children.values() {
            for c in kids {
                *seen.entry(c.id.clone()).or_default() += 1;
            }
        }
        for count in seen.values() {
            assert_eq!(*count, 1);
        }

        // Dangling parent: not a root, never reachable from the roots walk.
        assert!(!forest.roots.iter().any(|c| c.id == "3"));
        assert!(unreachable_ids(&cats).contains("3"));
    }

    #[test]
    fn forest_preserves_input_order_within_siblings() {
        let cats = vec![
            cat("1", "Work", None),
            cat("b", "Beta", Some("1")),
            cat("a", "Alpha", Some("1")),
        ];
        let forest = build_forest(&cats);
        let kid_ids: Vec<&str> = forest.children_of("1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kid_ids, ["b", "a"]);
    }

    #[test]
    fn build_forest_is_idempotent() {
        let cats = vec![cat("1", "Work", None), cat("2", "Code", Some("1"))];
        assert_eq!(build_forest(&cats), build_forest(&cats));
    }

    #[test]
    fn grouping_partitions_exhaustively_and_disjointly() {
        let cats = vec![cat("1", "Work", None), cat("2", "Code", Some("1"))];
        let prompts = vec![
            prompt("10", Some("2")),
            prompt("11", None),
            prompt("12", Some("ghost")),
            prompt("13", Some("")),
        ];
        let buckets = group_by_category(&prompts, &cats);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, prompts.len());

        let uncat = &buckets[&Bucket::Uncategorized];
        let uncat_ids: Vec<&str> = uncat.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(uncat_ids, ["11", "12", "13"]);
    }

    #[test]
    fn grouping_seeds_empty_buckets_for_known_categories() {
        // Scenario from the product contract: Work/Code tree, one categorized
        // prompt, one uncategorized.
        let cats = vec![cat("1", "Work", None), cat("2", "Code", Some("1"))];
        let prompts = vec![prompt("10", Some("2")), prompt("11", None)];

        let buckets = group_by_category(&prompts, &cats);
        assert!(buckets[&Bucket::Category("1".to_string())].is_empty());
        assert_eq!(buckets[&Bucket::Category("2".to_string())][0].id, "10");
        assert_eq!(buckets[&Bucket::Uncategorized][0].id, "11");

        let forest = build_forest(&cats);
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].id, "1");
        assert_eq!(forest.children_of("1")[0].id, "2");
    }

    #[test]
    fn group_by_category_is_idempotent() {
        let cats = vec![cat("1", "Work", None)];
        let prompts = vec![prompt("10", Some("1")), prompt("11", None)];
        assert_eq!(
            group_by_category(&prompts, &cats),
            group_by_category(&prompts, &cats)
        );
    }

    #[test]
    fn ancestors_of_nested_target() {
        let cats = vec![
            cat("1", "Work", None),
            cat("2", "Code", Some("1")),
            cat("3", "Rust", Some("2")),
        ];
        let expanded = ancestors_to_expand("3", &cats);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.contains("1"));
        assert!(expanded.contains("2"));
        assert!(!expanded.contains("3"));
    }

    #[test]
    fn ancestors_terminate_on_two_node_cycle() {
        let cats = vec![cat("A", "a", Some("B")), cat("B", "b", Some("A"))];
        let expanded = ancestors_to_expand("A", &cats);
        // Must return a finite set, not hang.
        assert!(expanded.len() <= 2);
        assert!(expanded.contains("B"));
    }

    #[test]
    fn ancestors_stop_at_dangling_parent() {
        let cats = vec![cat("1", "Work", Some("missing")), cat("2", "Code", Some("1"))];
        let expanded = ancestors_to_expand("2", &cats);
        assert_eq!(expanded.len(), 1);
        assert!(expanded.contains("1"));
    }

    #[test]
    fn depths_for_acyclic_forest() {
        let cats = vec![
            cat("1", "Work", None),
            cat("2", "Code", Some("1")),
            cat("3", "Rust", Some("2")),
        ];
        let depths = resolve_depths(&cats);
        assert_eq!(depths.depth_of("1"), Some(0));
        assert_eq!(depths.depth_of("2"), Some(1));
        assert_eq!(depths.depth_of("3"), Some(2));
        assert!(depths.cyclic_ids().is_empty());
    }

    #[test]
    fn self_parent_is_cyclic() {
        let cats = vec![cat("A", "a", Some("A"))];
        let depths = resolve_depths(&cats);
        assert!(depths.is_cyclic("A"));
        assert_eq!(depths.depth_of("A"), None);
    }

    #[test]
    fn cycle_members_and_their_descendants_are_tagged() {
        let cats = vec![
            cat("A", "a", Some("B")),
            cat("B", "b", Some("A")),
            cat("C", "c", Some("A")),
            cat("D", "d", None),
        ];
        let depths = resolve_depths(&cats);
        assert!(depths.is_cyclic("A"));
        assert!(depths.is_cyclic("B"));
        // C hangs off the cycle; its resolution path hits a cyclic node.
        assert!(depths.is_cyclic("C"));
        assert_eq!(depths.depth_of("D"), Some(0));

        let unreachable = unreachable_ids(&cats);
        assert!(unreachable.contains("A"));
        assert!(unreachable.contains("B"));
        assert!(unreachable.contains("C"));
        assert!(!unreachable.contains("D"));
    }

    #[test]
    fn dangling_parent_gets_defined_depth() {
        let cats = vec![cat("X", "x", Some("missing"))];
        let depths = resolve_depths(&cats);
        assert_eq!(depths.depth_of("X"), Some(0));
        assert!(unreachable_ids(&cats).contains("X"));
    }
}
