// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Static FetchXML schema tables used by completion.

use serde::Serialize;

/// Children allowed inside `parent`; `None` is the document root
pub fn child_elements(parent: Option<&str>) -> &'static [&'static str] {
    match parent {
        None => &["fetch"],
        Some("fetch") => &["entity"],
        Some("entity") => &[
            "attribute",
            "all-attributes",
            "link-entity",
            "filter",
            "order",
        ],
        Some("link-entity") => &[
            "attribute",
            "all-attributes",
            "link-entity",
            "filter",
            "order",
        ],
        Some("filter") => &["condition", "filter"],
        Some("condition") => &["value"],
        _ => &[],
    }
}

/// Attributes of `element`, most useful first
pub fn element_attributes(element: &str) -> &'static [&'static str] {
    match element {
        "fetch" => &[
            "version",
            "count",
            "page",
            "paging-cookie",
            "top",
            "distinct",
            "aggregate",
            "no-lock",
            "mapping",
            "output-format",
            "returntotalrecordcount",
        ],
        "entity" => &["name"],
        "attribute" => &[
            "name",
            "alias",
            "aggregate",
            "groupby",
            "dategrouping",
            "distinct",
        ],
        "link-entity" => &[
            "name",
            "from",
            "to",
            "alias",
            "link-type",
            "visible",
            "intersect",
        ],
        "filter" => &["type"],
        "condition" => &[
            "attribute",
            "operator",
            "value",
            "entityname",
            "uiname",
            "uitype",
        ],
        "order" => &["attribute", "alias", "descending"],
        _ => &[],
    }
}

const OPERATORS: &[&str] = &[
    "eq",
    "ne",
    "gt",
    "ge",
    "lt",
    "le",
    "like",
    "not-like",
    "in",
    "not-in",
    "between",
    "not-between",
    "null",
    "not-null",
    "begins-with",
    "not-begin-with",
    "ends-with",
    "not-end-with",
    "yesterday",
    "today",
    "tomorrow",
    "last-seven-days",
    "next-seven-days",
    "last-week",
    "this-week",
    "next-week",
    "last-month",
    "this-month",
    "next-month",
    "last-year",
    "this-year",
    "next-year",
    "last-x-days",
    "next-x-days",
    "on",
    "on-or-before",
    "on-or-after",
    "eq-userid",
    "ne-userid",
    "eq-businessid",
    "ne-businessid",
    "under",
    "eq-or-under",
    "above",
    "eq-or-above",
];

const BOOLEANS: &[&str] = &["true", "false"];

/// How the value of an attribute is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    /// Entity logical names from the catalog
    Entity,
    /// Attribute logical names of the context entity
    Attribute,
    /// Fixed list, see [`value_suggestions`]
    Enumerated,
    /// Anything; no suggestions
    Free,
}

/// Kind of value expected by `element@attribute`
pub fn value_kind(element: &str, attribute: &str) -> ValueKind {
    match (element, attribute) {
        ("entity" | "link-entity", "name") => ValueKind::Entity,
        ("attribute", "name")
        | ("order" | "condition", "attribute")
        | ("link-entity", "from" | "to") => ValueKind::Attribute,
        _ if !value_suggestions(element, attribute).is_empty() => ValueKind::Enumerated,
        _ => ValueKind::Free,
    }
}

/// Static values for enumerated attributes
pub fn value_suggestions(element: &str, attribute: &str) -> &'static [&'static str] {
    match (element, attribute) {
        ("condition", "operator") => OPERATORS,
        ("filter", "type") => &["and", "or"],
        ("link-entity", "link-type") => &["inner", "outer"],
        ("attribute", "aggregate") => &["avg", "count", "countcolumn", "max", "min", "sum"],
        ("attribute", "dategrouping") => &[
            "day",
            "week",
            "month",
            "quarter",
            "year",
            "fiscal-period",
            "fiscal-year",
        ],
        ("fetch", "mapping") => &["logical"],
        ("fetch", "output-format") => &["xml-platform"],
        ("fetch", "distinct" | "aggregate" | "no-lock" | "returntotalrecordcount")
        | ("attribute", "groupby" | "distinct")
        | ("link-entity", "visible" | "intersect")
        | ("order", "descending") => BOOLEANS,
        _ => &[],
    }
}
