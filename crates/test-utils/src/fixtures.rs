// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample queries
//!
//! All SQL fixtures target the standard mock schema
//! (see [`MockCatalogBuilder::with_standard_schema`]).
//!
//! [`MockCatalogBuilder::with_standard_schema`]: crate::MockCatalogBuilder::with_standard_schema

/// Sample SQL queries for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== Basic SELECT queries =====

    /// Simple SELECT with column list
    pub const fn simple_select() -> &'static str {
        "SELECT name, revenue FROM account"
    }

    /// SELECT with all columns
    pub const fn select_all() -> &'static str {
        "SELECT * FROM account"
    }

    /// SELECT with WHERE clause
    pub const fn select_with_where() -> &'static str {
        "SELECT name FROM account WHERE statecode = 0 AND name LIKE 'Contoso%'"
    }

    /// SELECT with ORDER BY
    pub const fn select_with_order() -> &'static str {
        "SELECT name, revenue FROM account ORDER BY revenue DESC, name"
    }

    /// SELECT with TOP
    pub const fn select_with_top() -> &'static str {
        "SELECT TOP 10 name FROM account"
    }

    /// SELECT with LIMIT
    pub const fn select_with_limit() -> &'static str {
        "SELECT name FROM account LIMIT 50"
    }

    // ===== JOIN queries =====

    pub const fn inner_join() -> &'static str {
        "SELECT a.name, c.fullname FROM account a INNER JOIN contact c ON a.primarycontactid = c.contactid"
    }

    pub const fn left_join() -> &'static str {
        "SELECT a.name, c.fullname FROM account a LEFT OUTER JOIN contact c ON a.primarycontactid = c.contactid"
    }

    // ===== Aggregates =====

    pub const fn count_star() -> &'static str {
        "SELECT COUNT(*) AS total FROM account"
    }

    pub const fn group_by() -> &'static str {
        "SELECT industrycode, COUNT(*) AS total FROM account GROUP BY industrycode"
    }

    // ===== Virtual columns =====

    /// Lookup name column without its parent
    pub const fn virtual_columns() -> &'static str {
        "SELECT name, primarycontactidname FROM account"
    }

    /// Lookup name column together with its parent
    pub const fn virtual_and_parent() -> &'static str {
        "SELECT primarycontactid, primarycontactidname FROM account"
    }

    // ===== Filters =====

    pub const fn in_list() -> &'static str {
        "SELECT name FROM account WHERE industrycode IN (1, 2, 3)"
    }

    pub const fn or_filter() -> &'static str {
        "SELECT name FROM account WHERE revenue > 1000000 OR statecode = 1"
    }

    // ===== Invalid queries =====

    /// `SELECT FROM` with nothing in between
    pub const fn empty_column_list() -> &'static str {
        "SELECT FROM account"
    }

    pub const fn missing_from() -> &'static str {
        "SELECT * account"
    }

    /// Every fixture that must parse
    pub fn valid_queries() -> Vec<&'static str> {
        vec![
            Self::simple_select(),
            Self::select_all(),
            Self::select_with_where(),
            Self::select_with_order(),
            Self::select_with_top(),
            Self::select_with_limit(),
            Self::inner_join(),
            Self::left_join(),
            Self::count_star(),
            Self::group_by(),
            Self::virtual_columns(),
            Self::virtual_and_parent(),
            Self::in_list(),
            Self::or_filter(),
        ]
    }

    /// Every fixture that must be rejected
    pub fn invalid_queries() -> Vec<&'static str> {
        vec![
            "",
            "UPDATE account SET name = 'x'",
            Self::empty_column_list(),
            Self::missing_from(),
            "SELECT name FROM",
            "SELECT name FROM account WHERE",
            "SELECT name FROM account WHERE name = 'unterminated",
        ]
    }
}

/// Sample FetchXML documents for testing
pub struct FetchXmlFixtures;

impl FetchXmlFixtures {
    pub const fn simple_fetch() -> &'static str {
        r#"<fetch><entity name="account"><attribute name="name" /></entity></fetch>"#
    }

    pub const fn filtered_fetch() -> &'static str {
        r#"<fetch top="10">
  <entity name="account">
    <attribute name="name" />
    <filter type="and">
      <condition attribute="statecode" operator="eq" value="0" />
    </filter>
  </entity>
</fetch>"#
    }

    pub const fn linked_fetch() -> &'static str {
        r#"<fetch>
  <entity name="account">
    <attribute name="name" />
    <link-entity name="contact" from="contactid" to="primarycontactid" alias="c" link-type="inner">
      <attribute name="fullname" />
    </link-entity>
  </entity>
</fetch>"#
    }
}
