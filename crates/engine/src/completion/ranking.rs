// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Suggestion ranking
//!
//! Candidates are filtered against the typed prefix and ordered by tier:
//!
//! 1. exact logical-name match
//! 2. logical-name prefix match
//! 3. any other match: a display-name word starting with the prefix, or the
//!    prefix occurring inside the logical or display name
//!
//! Inside a tier candidates are alphabetical by logical name, ignoring case.
//! Candidates matching nothing are dropped. With an empty prefix everything
//! is kept in alphabetical order.

use std::cmp::Ordering;

/// How well a candidate matches the typed prefix; lower is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Prefix,
    Other,
}

/// Tier of `name` / `display_name` for `prefix`, `None` when it does not match
pub fn match_tier(prefix: &str, name: &str, display_name: Option<&str>) -> Option<MatchTier> {
    if prefix.is_empty() {
        return Some(MatchTier::Prefix);
    }

    let prefix = prefix.to_lowercase();
    let name = name.to_lowercase();
    if name == prefix {
        return Some(MatchTier::Exact);
    }
    if name.starts_with(&prefix) {
        return Some(MatchTier::Prefix);
    }

    let display = display_name.map(str::to_lowercase).unwrap_or_default();
    let display_word = display
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with(&prefix));
    if display_word || name.contains(&prefix) || display.contains(&prefix) {
        return Some(MatchTier::Other);
    }
    None
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter and order `items` for `prefix`
///
/// `key` yields the logical name and optional display name of an item.
pub fn rank<T, F>(items: Vec<T>, prefix: &str, key: F) -> Vec<T>
where
    F: Fn(&T) -> (&str, Option<&str>),
{
    let mut tiered: Vec<(MatchTier, T)> = items
        .into_iter()
        .filter_map(|item| {
            let (name, display) = key(&item);
            match_tier(prefix, name, display).map(|tier| (tier, item))
        })
        .collect();

    tiered.sort_by(|(tier_a, a), (tier_b, b)| {
        tier_a
            .cmp(tier_b)
            .then_with(|| alphabetical(key(a).0, key(b).0))
    });
    tiered.into_iter().map(|(_, item)| item).collect()
}

/// Rank plain names
pub fn rank_names<S: AsRef<str>>(names: Vec<S>, prefix: &str) -> Vec<S> {
    rank(names, prefix, |n| (n.as_ref(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_before_prefix() {
        assert_eq!(
            rank_names(vec!["accounthistory", "account"], "account"),
            vec!["account", "accounthistory"]
        );
    }

    #[test]
    fn test_prefix_before_substring() {
        assert_eq!(
            rank_names(vec!["myaccount", "account"], "acc"),
            vec!["account", "myaccount"]
        );
    }

    #[test]
    fn test_display_name_word_match() {
        let items = vec![
            ("new_projectcost", Some("Project Cost")),
            ("contact", Some("Contact")),
            ("costcenter", None),
        ];
        let ranked = rank(items, "cost", |(n, d)| (*n, *d));
        let names: Vec<_> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["costcenter", "new_projectcost"]);
    }

    #[test]
    fn test_empty_prefix_is_alphabetical() {
        assert_eq!(
            rank_names(vec!["lead", "Contact", "account"], ""),
            vec!["account", "Contact", "lead"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(match_tier("ACC", "account", None), Some(MatchTier::Prefix));
        assert_eq!(match_tier("Account", "account", None), Some(MatchTier::Exact));
        assert_eq!(match_tier("xyz", "account", Some("Account")), None);
    }
}
