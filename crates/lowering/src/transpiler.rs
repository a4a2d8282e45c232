// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL → FetchXML transpiler
//!
//! Pure mapping from a parsed [`SqlSelectStatement`] to FetchXML text. No
//! metadata is consulted: attribute and entity names are emitted as written.
//!
//! ## Layout
//!
//! ```xml
//! <fetch top="10" aggregate="true">
//!   <entity name="account">
//!     <attribute name="industrycode" alias="industrycode" groupby="true"/>
//!     <attribute name="accountid" alias="total" aggregate="count"/>
//!     <order alias="total" descending="true"/>
//!     <filter type="and">
//!       <condition attribute="statecode" operator="eq" value="0"/>
//!     </filter>
//!     <link-entity name="contact" from="contactid" to="primarycontactid" alias="c" link-type="inner">
//!       <attribute name="fullname"/>
//!     </link-entity>
//!   </entity>
//! </fetch>
//! ```
//!
//! Children of an entity are always written in the order attributes, orders,
//! filter, link-entities. A link-entity is nested under the table its ON
//! condition refers to.

use dataverse_sql_ir::{
    AggregateColumn, AggregateFunction, ColumnRef, Condition, OrderByItem, SelectColumn,
    SqlSelectStatement,
};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};
use tracing::error;

const INDENT_WIDTH: usize = 2;

/// Table a column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Main,
    Join(usize),
}

/// In-memory element tree, rendered once complete
#[derive(Debug, Default)]
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    fn attr_if(self, condition: bool, key: &'static str, value: &str) -> Self {
        if condition { self.attr(key, value) } else { self }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let start = BytesStart::new(self.name)
            .with_attributes(self.attributes.iter().map(|(k, v)| (*k, v.as_str())));

        if let Some(text) = &self.text {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            return writer.write_event(Event::End(BytesEnd::new(self.name)));
        }
        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name)))
    }
}

/// Translate a statement into FetchXML
///
/// Deterministic: the same statement always yields byte-identical output.
pub fn transpile(statement: &SqlSelectStatement) -> String {
    let mut fetch = Element::new("fetch");
    if let Some(top) = statement.row_limit {
        fetch = fetch.attr("top", top.to_string());
    }
    fetch = fetch
        .attr_if(statement.distinct, "distinct", "true")
        .attr_if(statement.is_aggregate(), "aggregate", "true");

    let transpiler = Transpiler { stmt: statement };
    fetch.children.push(transpiler.entity());

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    match fetch.write(&mut writer) {
        Ok(()) => String::from_utf8_lossy(&writer.into_inner()).into_owned(),
        Err(err) => {
            // Writes into a Vec<u8> do not fail
            error!(%err, "FetchXML writer failed");
            String::new()
        }
    }
}

struct Transpiler<'a> {
    stmt: &'a SqlSelectStatement,
}

impl Transpiler<'_> {
    fn table_of(&self, qualifier: Option<&str>) -> Table {
        match qualifier {
            None => Table::Main,
            Some(q) if self.stmt.is_main_entity_qualifier(q) => Table::Main,
            Some(q) => self
                .stmt
                .joins
                .iter()
                .position(|j| j.is_referenced_by(q))
                .map(Table::Join)
                .unwrap_or(Table::Main),
        }
    }

    fn entity(&self) -> Element {
        let mut entity = Element::new("entity").attr("name", self.stmt.entity_name.as_str());
        self.fill_table(&mut entity, Table::Main);

        if let Some(filter) = self.filter() {
            // Filter goes between orders and link-entities
            let links = entity
                .children
                .iter()
                .position(|c| c.name == "link-entity")
                .unwrap_or(entity.children.len());
            entity.children.insert(links, filter);
        }
        entity
    }

    /// Attributes, orders and nested link-entities of one table
    fn fill_table(&self, element: &mut Element, table: Table) {
        element.children.extend(self.attributes(table));
        element.children.extend(self.orders(table));

        for (index, join) in self.stmt.joins.iter().enumerate() {
            if self.table_of(join.left.table_name.as_deref()) != table {
                continue;
            }
            // Joins only hang off earlier tables
            if matches!(table, Table::Join(current) if index <= current) {
                continue;
            }
            let mut link = Element::new("link-entity")
                .attr("name", join.entity_name.as_str())
                .attr("from", join.right.column_name.as_str())
                .attr("to", join.left.column_name.as_str())
                .attr("alias", join.reference_name())
                .attr("link-type", join.join_type.link_type());
            self.fill_table(&mut link, Table::Join(index));
            element.children.push(link);
        }
    }

    fn attributes(&self, table: Table) -> Vec<Element> {
        let wildcard = self.stmt.column_refs().any(|c| {
            c.is_wildcard && self.table_of(c.table_name.as_deref()) == table
        });
        if wildcard {
            return vec![Element::new("all-attributes")];
        }

        let aggregate_query = self.stmt.is_aggregate();
        self.stmt
            .columns
            .iter()
            .filter_map(|column| match column {
                SelectColumn::Column(col) => {
                    (self.table_of(col.table_name.as_deref()) == table)
                        .then(|| column_attribute(col, aggregate_query))
                }
                SelectColumn::Aggregate(agg) => (self.table_of(agg.table_name.as_deref())
                    == table)
                    .then(|| self.aggregate_attribute(agg, table)),
            })
            .collect()
    }

    fn aggregate_attribute(&self, agg: &AggregateColumn, table: Table) -> Element {
        let (name, function) = if agg.is_count_star() {
            (self.primary_id(table), "count")
        } else if agg.function == AggregateFunction::Count {
            (agg.column_name.clone(), "countcolumn")
        } else {
            (agg.column_name.clone(), agg.function.as_str())
        };

        Element::new("attribute")
            .attr("name", name)
            .attr("alias", agg.alias.as_str())
            .attr("aggregate", function)
            .attr_if(agg.distinct, "distinct", "true")
    }

    /// `<entity>id` by Dataverse convention
    fn primary_id(&self, table: Table) -> String {
        let entity = match table {
            Table::Main => &self.stmt.entity_name,
            Table::Join(index) => &self.stmt.joins[index].entity_name,
        };
        format!("{}id", entity.to_lowercase())
    }

    fn orders(&self, table: Table) -> Vec<Element> {
        self.stmt
            .order_by
            .iter()
            .filter_map(|item| self.order(item, table))
            .collect()
    }

    fn order(&self, item: &OrderByItem, table: Table) -> Option<Element> {
        let descending = if item.descending { "true" } else { "false" };
        let column = &item.column;

        if column.table_name.is_none() {
            let selected = self
                .stmt
                .columns
                .iter()
                .find(|c| c.output_name().eq_ignore_ascii_case(&column.column_name));

            if self.stmt.is_aggregate() {
                if let Some(selected) = selected {
                    // Aggregate results are ordered by alias, on the entity
                    return (table == Table::Main).then(|| {
                        Element::new("order")
                            .attr("alias", selected.output_name())
                            .attr("descending", descending)
                    });
                }
            } else if let Some(SelectColumn::Column(col)) = selected {
                if col.alias.is_some() && !col.is_wildcard {
                    return (self.table_of(col.table_name.as_deref()) == table).then(|| {
                        Element::new("order")
                            .attr("attribute", col.column_name.as_str())
                            .attr("descending", descending)
                    });
                }
            }
        }

        (self.table_of(column.table_name.as_deref()) == table).then(|| {
            Element::new("order")
                .attr("attribute", column.column_name.as_str())
                .attr("descending", descending)
        })
    }

    fn filter(&self) -> Option<Element> {
        let clause = self.stmt.where_conditions.as_ref()?;
        if clause.conditions.is_empty() {
            return None;
        }

        let mut filter = Element::new("filter").attr("type", clause.operator.fetch_type());
        filter.children = clause
            .conditions
            .iter()
            .map(|c| self.condition(c))
            .collect();
        Some(filter)
    }

    fn condition(&self, condition: &Condition) -> Element {
        let mut element = Element::new("condition");

        if let Table::Join(index) = self.table_of(condition.column.table_name.as_deref()) {
            element = element.attr("entityname", self.stmt.joins[index].reference_name());
        }
        element = element
            .attr("attribute", condition.column.column_name.as_str())
            .attr("operator", condition.operator.fetch_operator());

        if condition.operator.is_unary() {
            return element;
        }
        if condition.operator.is_list() {
            element.children = condition
                .values
                .iter()
                .map(|v| Element::new("value").text(v.to_fetch_value()))
                .collect();
            return element;
        }
        match condition.values.first() {
            Some(value) => element.attr("value", value.to_fetch_value()),
            None => element,
        }
    }
}

fn column_attribute(col: &ColumnRef, aggregate_query: bool) -> Element {
    let attribute = Element::new("attribute").attr("name", col.column_name.as_str());
    if aggregate_query {
        attribute
            .attr("alias", col.output_name())
            .attr("groupby", "true")
    } else {
        match &col.alias {
            Some(alias) => attribute.attr("alias", alias.as_str()),
            None => attribute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataverse_sql_ir::{
        ConditionOperator, JoinClause, JoinType, Literal, LogicalOperator, WhereClause,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_select() {
        let stmt = SqlSelectStatement::new("account").with_columns(vec![
            SelectColumn::Column(ColumnRef::new("name")),
            SelectColumn::Column(ColumnRef::new("revenue").with_alias("rev")),
        ]);
        assert_eq!(
            transpile(&stmt),
            "<fetch>\n\
             \x20 <entity name=\"account\">\n\
             \x20   <attribute name=\"name\"/>\n\
             \x20   <attribute name=\"revenue\" alias=\"rev\"/>\n\
             \x20 </entity>\n\
             </fetch>"
        );
    }

    #[test]
    fn test_wildcard_with_top_and_distinct() {
        let mut stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Column(ColumnRef::wildcard())])
            .with_row_limit(10);
        stmt.distinct = true;
        assert_eq!(
            transpile(&stmt),
            "<fetch top=\"10\" distinct=\"true\">\n\
             \x20 <entity name=\"account\">\n\
             \x20   <all-attributes/>\n\
             \x20 </entity>\n\
             </fetch>"
        );
    }

    #[test]
    fn test_count_star_uses_primary_id() {
        let stmt = SqlSelectStatement::new("Account").with_columns(vec![SelectColumn::Aggregate(
            AggregateColumn::new(AggregateFunction::Count, "*", "total"),
        )]);
        let xml = transpile(&stmt);
        assert!(xml.starts_with("<fetch aggregate=\"true\">"));
        assert!(xml.contains("<attribute name=\"accountid\" alias=\"total\" aggregate=\"count\"/>"));
    }

    #[test]
    fn test_count_column_distinct() {
        let mut agg = AggregateColumn::new(AggregateFunction::Count, "industrycode", "n");
        agg.distinct = true;
        let stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Aggregate(agg)]);
        assert!(transpile(&stmt).contains(
            "<attribute name=\"industrycode\" alias=\"n\" aggregate=\"countcolumn\" distinct=\"true\"/>"
        ));
    }

    #[test]
    fn test_filter_values_are_escaped() {
        let stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
            .with_where(WhereClause {
                operator: LogicalOperator::Or,
                conditions: vec![
                    Condition::new(
                        ColumnRef::new("name"),
                        ConditionOperator::Like,
                        vec![Literal::String("A&B <\"x\">%".to_string())],
                    ),
                    Condition::new(ColumnRef::new("revenue"), ConditionOperator::IsNull, vec![]),
                ],
            });
        let xml = transpile(&stmt);
        assert!(xml.contains("<filter type=\"or\">"));
        assert!(xml.contains("value=\"A&amp;B &lt;&quot;x&quot;&gt;%\""));
        assert!(xml.contains("<condition attribute=\"revenue\" operator=\"null\"/>"));
    }

    #[test]
    fn test_output_reads_back_with_original_values() {
        use quick_xml::Reader;

        let value = "Tom & Jerry's <\"best\">";
        let stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
            .with_where(WhereClause {
                operator: LogicalOperator::And,
                conditions: vec![Condition::new(
                    ColumnRef::new("name"),
                    ConditionOperator::Eq,
                    vec![Literal::String(value.to_string())],
                )],
            });
        let xml = transpile(&stmt);

        let mut reader = Reader::from_str(&xml);
        let mut names = Vec::new();
        let mut read_value = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap());
                    if let Some(attr) = e.try_get_attribute("value").unwrap() {
                        read_value = Some(attr.unescape_value().unwrap().into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(names, vec!["fetch", "entity", "attribute", "filter", "condition"]);
        assert_eq!(read_value.as_deref(), Some(value));
    }

    #[test]
    fn test_in_list_uses_value_children() {
        let stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
            .with_where(WhereClause {
                operator: LogicalOperator::And,
                conditions: vec![Condition::new(
                    ColumnRef::new("industrycode"),
                    ConditionOperator::In,
                    vec![Literal::Integer(1), Literal::Integer(2)],
                )],
            });
        assert!(transpile(&stmt).contains(
            "      <condition attribute=\"industrycode\" operator=\"in\">\n\
             \x20       <value>1</value>\n\
             \x20       <value>2</value>\n\
             \x20     </condition>\n"
        ));
    }

    #[test]
    fn test_join_columns_and_conditions() {
        let mut stmt = SqlSelectStatement::new("account")
            .with_columns(vec![
                SelectColumn::Column(ColumnRef::qualified("a", "name")),
                SelectColumn::Column(ColumnRef::qualified("c", "fullname")),
            ])
            .with_joins(vec![JoinClause {
                join_type: JoinType::LeftOuter,
                entity_name: "contact".to_string(),
                alias: Some("c".to_string()),
                left: ColumnRef::qualified("a", "primarycontactid"),
                right: ColumnRef::qualified("c", "contactid"),
            }])
            .with_where(WhereClause {
                operator: LogicalOperator::And,
                conditions: vec![Condition::new(
                    ColumnRef::qualified("c", "emailaddress1"),
                    ConditionOperator::IsNotNull,
                    vec![],
                )],
            });
        stmt.entity_alias = Some("a".to_string());

        assert_eq!(
            transpile(&stmt),
            "<fetch>\n\
             \x20 <entity name=\"account\">\n\
             \x20   <attribute name=\"name\"/>\n\
             \x20   <filter type=\"and\">\n\
             \x20     <condition entityname=\"c\" attribute=\"emailaddress1\" operator=\"not-null\"/>\n\
             \x20   </filter>\n\
             \x20   <link-entity name=\"contact\" from=\"contactid\" to=\"primarycontactid\" alias=\"c\" link-type=\"outer\">\n\
             \x20     <attribute name=\"fullname\"/>\n\
             \x20   </link-entity>\n\
             \x20 </entity>\n\
             </fetch>"
        );
    }

    #[test]
    fn test_aggregate_group_by_and_alias_order() {
        let stmt = SqlSelectStatement {
            group_by: vec![ColumnRef::new("industrycode")],
            ..SqlSelectStatement::new("account")
                .with_columns(vec![
                    SelectColumn::Column(ColumnRef::new("industrycode")),
                    SelectColumn::Aggregate(AggregateColumn::new(
                        AggregateFunction::Sum,
                        "revenue",
                        "total",
                    )),
                ])
                .with_order_by(vec![OrderByItem {
                    column: ColumnRef::new("total"),
                    descending: true,
                }])
        };
        assert_eq!(
            transpile(&stmt),
            "<fetch aggregate=\"true\">\n\
             \x20 <entity name=\"account\">\n\
             \x20   <attribute name=\"industrycode\" alias=\"industrycode\" groupby=\"true\"/>\n\
             \x20   <attribute name=\"revenue\" alias=\"total\" aggregate=\"sum\"/>\n\
             \x20   <order alias=\"total\" descending=\"true\"/>\n\
             \x20 </entity>\n\
             </fetch>"
        );
    }

    #[test]
    fn test_order_by_column_alias_uses_attribute() {
        let stmt = SqlSelectStatement::new("account")
            .with_columns(vec![SelectColumn::Column(
                ColumnRef::new("revenue").with_alias("rev"),
            )])
            .with_order_by(vec![OrderByItem {
                column: ColumnRef::new("rev"),
                descending: false,
            }]);
        assert!(transpile(&stmt).contains("<order attribute=\"revenue\" descending=\"false\"/>"));
    }
}
