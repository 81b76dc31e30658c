//! Helpers for the ad-hoc SQL console: the keyword denylist, statement
//! classification, and conversion of dynamically-typed result rows into JSON.

use crate::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlColumn, MySqlRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Substrings that get a statement rejected before it reaches the database.
///
/// This is a textual containment check, not a parser: it over-blocks (a
/// denylisted token inside a string literal or comment still rejects) and
/// under-blocks (equivalent statements phrased around the tokens pass). That
/// behavior is deliberate and documented; it is an advisory safety net, not
/// a security boundary.
pub const FORBIDDEN_KEYWORDS: [&str; 7] = [
    "DROP DATABASE",
    "SHUTDOWN",
    "GRANT",
    "REVOKE",
    "DELETE FROM",
    "TRUNCATE",
    "DROP TABLE",
];

/// Returns the first denylisted keyword contained in the statement, if any.
pub fn forbidden_keyword(statement: &str) -> Option<&'static str> {
    let upper = statement.to_uppercase();
    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| upper.contains(keyword))
}

/// How a console statement is dispatched and which response shape it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns a row set (SELECT and friends).
    Query,
    /// Changes rows and reports an affected count plus generated id.
    Mutation,
    /// Schema definition and everything else; acknowledged generically.
    Definition,
}

impl StatementKind {
    /// Classifies a statement by its leading keyword, tolerating leading
    /// whitespace and `--`, `#`, and `/* ... */` comments.
    pub fn classify(statement: &str) -> Self {
        match leading_keyword(statement).as_deref() {
            Some(
                "SELECT" | "SHOW" | "DESCRIBE" | "DESC" | "EXPLAIN" | "WITH" | "TABLE"
                | "VALUES" | "CALL",
            ) => StatementKind::Query,
            Some("INSERT" | "UPDATE" | "DELETE" | "REPLACE") => StatementKind::Mutation,
            _ => StatementKind::Definition,
        }
    }
}

/// What executing a console statement produced, shaped per statement kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteOutcome {
    Rows(Vec<Map<String, Value>>),
    Mutation { affected_rows: u64, insert_id: u64 },
    Definition,
}

fn leading_keyword(statement: &str) -> Option<String> {
    let mut rest = statement;
    loop {
        rest = rest.trim_start();
        if let Some(stripped) = rest.strip_prefix("--") {
            rest = stripped.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(stripped) = rest.strip_prefix('#') {
            rest = stripped.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(stripped) = rest.strip_prefix("/*") {
            rest = stripped.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
    }

    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if word.is_empty() {
        None
    } else {
        Some(word.to_ascii_uppercase())
    }
}

/// Converts fetched rows into JSON objects keyed by column name.
pub fn rows_to_json(rows: &[MySqlRow]) -> Result<Vec<Map<String, Value>>, DbError> {
    rows.iter().map(row_to_json).collect()
}

fn row_to_json(row: &MySqlRow) -> Result<Map<String, Value>, DbError> {
    let mut object = Map::new();
    for column in row.columns() {
        object.insert(column.name().to_string(), decode_value(row, column)?);
    }
    Ok(object)
}

/// Decodes one column of a dynamically-typed row into a JSON value, keyed off
/// the MySQL column type name.
fn decode_value(row: &MySqlRow, column: &MySqlColumn) -> Result<Value, DbError> {
    let index = column.ordinal();
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match column.type_info().name() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" | "BIT" => Value::from(row.try_get::<u64, _>(index)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        // DECIMAL stays a string, exactly as the original driver surfaced it.
        "DECIMAL" => Value::String(row.try_get::<Decimal, _>(index)?.to_string()),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
        "DATETIME" => Value::String(
            row.try_get::<NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<DateTime<Utc>, _>(index)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "JSON" => row.try_get::<Value, _>(index)?,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            Value::String(row.try_get::<String, _>(index)?)
        }
        // BLOB family and anything unexpected: try text, fall back to lossy UTF-8.
        _ => match row.try_get::<String, _>(index) {
            Ok(text) => Value::String(text),
            Err(_) => {
                let bytes = row.try_get::<Vec<u8>, _>(index)?;
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_denylisted_keyword_is_caught() {
        for keyword in FORBIDDEN_KEYWORDS {
            let statement = format!("this statement contains {keyword} somewhere");
            assert_eq!(forbidden_keyword(&statement), Some(keyword));
        }
    }

    #[test]
    fn the_check_is_case_insensitive() {
        assert_eq!(
            forbidden_keyword("delete from customers where 1=1"),
            Some("DELETE FROM")
        );
        assert_eq!(forbidden_keyword("Drop Table products"), Some("DROP TABLE"));
    }

    #[test]
    fn tokens_inside_literals_and_comments_still_reject() {
        // Over-blocking is part of the contract: containment, not parsing.
        assert_eq!(
            forbidden_keyword("SELECT 'DROP TABLE users' AS note"),
            Some("DROP TABLE")
        );
        assert_eq!(
            forbidden_keyword("SELECT 1 -- cleanup: DELETE FROM payments later"),
            Some("DELETE FROM")
        );
    }

    #[test]
    fn destructive_statements_avoiding_the_tokens_pass() {
        // Under-blocking is equally part of the contract; the filter is
        // bypassable by construction and these document that.
        assert_eq!(
            forbidden_keyword("ALTER TABLE products RENAME TO products_retired"),
            None
        );
        assert_eq!(forbidden_keyword("DROP VIEW daily_totals"), None);
        assert_eq!(forbidden_keyword(""), None);
    }

    #[test]
    fn row_returning_statements_classify_as_queries() {
        for statement in [
            "SELECT * FROM products",
            "  select 1",
            "-- leading comment\nSELECT 1",
            "/* hint */ WITH t AS (SELECT 1) SELECT * FROM t",
            "# mysql style comment\nshow triggers",
            "EXPLAIN SELECT 1",
            "DESCRIBE products",
            "CALL get_customer_discount('Asha')",
        ] {
            assert_eq!(
                StatementKind::classify(statement),
                StatementKind::Query,
                "statement = {statement:?}"
            );
        }
    }

    #[test]
    fn mutations_classify_as_mutations() {
        for statement in [
            "INSERT INTO categories (category_name) VALUES ('Grains')",
            "update products set price = 1 where product_id = 1",
            "DELETE FROM order_items WHERE order_item_id = 9",
            "replace into memberships (membership_id, type) values (1, 'Gold')",
        ] {
            assert_eq!(StatementKind::classify(statement), StatementKind::Mutation);
        }
    }

    #[test]
    fn everything_else_classifies_as_definition() {
        for statement in [
            "CREATE TABLE t (id INT)",
            "ALTER TABLE products ADD COLUMN sku VARCHAR(20)",
            "DROP VIEW daily_totals",
            "SET @x = 1",
            "",
            "-- only a comment",
        ] {
            assert_eq!(StatementKind::classify(statement), StatementKind::Definition);
        }
    }
}
