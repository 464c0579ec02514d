//! Rule table layout and statement construction.
//!
//! The rule table has a fixed shape: a mandatory `ptype` column followed by
//! [`MAX_FIELDS`] nullable value columns `v0`..`v5`. DDL lives in
//! [`Dialect`]; this module builds the DML statements the adapter issues.

use crate::storage::dialect::Dialect;
use crate::storage::executor::Statement;
use crate::storage::rule::{MAX_FIELDS, RuleRecord};

/// Column width for every rule column.
pub const COLUMN_WIDTH: usize = 100;

/// Rule table columns in positional order.
pub const RULE_COLUMNS: [&str; MAX_FIELDS + 1] = ["ptype", "v0", "v1", "v2", "v3", "v4", "v5"];

/// Default rule table name.
pub const DEFAULT_TABLE_NAME: &str = "casbin_rule";

/// Default database name created when the target database does not exist.
pub const DEFAULT_DATABASE_NAME: &str = "casbin";

/// `SELECT` of every rule row.
pub fn select_all(table: &str) -> Statement {
    Statement::new(format!("SELECT {} FROM {table}", RULE_COLUMNS.join(", ")))
}

/// `INSERT` of one rule row. Absent fields are bound as `NULL`.
pub fn insert(dialect: Dialect, table: &str, record: &RuleRecord) -> Statement {
    let placeholders = (1..=RULE_COLUMNS.len())
        .map(|n| dialect.placeholder(n))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        RULE_COLUMNS.join(", ")
    );

    let mut params = Vec::with_capacity(RULE_COLUMNS.len());
    params.push(Some(record.ptype.clone()));
    params.extend(record.fields.iter().cloned());

    Statement::with_params(sql, params)
}

/// Whether `len` filter values starting at `v{field_index}` stay within `v5`.
pub fn filter_in_range(field_index: usize, len: usize) -> bool {
    field_index < MAX_FIELDS && len <= MAX_FIELDS - field_index
}

/// `DELETE` of the rows matching `ptype` and the positional filter.
///
/// Value `i` constrains column `v{field_index + i}`. Callers check the
/// range with [`filter_in_range`] beforehand; values past `v5` are ignored.
pub fn delete_filtered(
    dialect: Dialect,
    table: &str,
    ptype: &str,
    field_index: usize,
    field_values: &[String],
) -> Statement {
    let mut sql = format!("DELETE FROM {table} WHERE ptype = {}", dialect.placeholder(1));
    let mut params = Vec::with_capacity(field_values.len() + 1);
    params.push(Some(ptype.to_string()));

    let columns = RULE_COLUMNS[1..].iter().skip(field_index);
    for (i, (column, value)) in columns.zip(field_values).enumerate() {
        sql.push_str(&format!(" AND {column} = {}", dialect.placeholder(i + 2)));
        params.push(Some(value.clone()));
    }

    Statement::with_params(sql, params)
}

/// `DELETE` of every rule row, keeping the table.
pub fn delete_all(table: &str) -> Statement {
    Statement::new(format!("DELETE FROM {table}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        assert_eq!(
            select_all("casbin_rule").sql,
            "SELECT ptype, v0, v1, v2, v3, v4, v5 FROM casbin_rule"
        );
    }

    #[test]
    fn test_insert_binds_absent_fields_as_null() {
        let record = RuleRecord::from_rule("p", &["alice", "data1", "read"]);
        let stmt = insert(Dialect::Sqlite, "casbin_rule", &record);

        assert_eq!(
            stmt.sql,
            "INSERT INTO casbin_rule (ptype, v0, v1, v2, v3, v4, v5) VALUES (?, ?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(
            stmt.params,
            vec![
                Some("p".to_string()),
                Some("alice".to_string()),
                Some("data1".to_string()),
                Some("read".to_string()),
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_insert_postgres_placeholders() {
        let record = RuleRecord::from_rule("g", &["alice", "admin"]);
        let stmt = insert(Dialect::Postgres, "rules", &record);
        assert!(stmt.sql.ends_with("VALUES ($1, $2, $3, $4, $5, $6, $7)"));
    }

    #[test]
    fn test_delete_filtered_offsets_columns() {
        let stmt = delete_filtered(
            Dialect::MySql,
            "casbin_rule",
            "p",
            1,
            &["data1".to_string(), "read".to_string()],
        );
        assert_eq!(
            stmt.sql,
            "DELETE FROM casbin_rule WHERE ptype = ? AND v1 = ? AND v2 = ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Some("p".to_string()),
                Some("data1".to_string()),
                Some("read".to_string()),
            ]
        );
    }

    #[test]
    fn test_delete_filtered_oracle_placeholders() {
        let stmt = delete_filtered(Dialect::Oracle, "casbin_rule", "g", 0, &["alice".to_string()]);
        assert_eq!(stmt.sql, "DELETE FROM casbin_rule WHERE ptype = :1 AND v0 = :2");
    }

    #[test]
    fn test_filter_in_range() {
        assert!(filter_in_range(0, 6));
        assert!(filter_in_range(5, 1));
        assert!(filter_in_range(6, 0));
        assert!(!filter_in_range(0, 7));
        assert!(!filter_in_range(4, 3));
        assert!(!filter_in_range(6, 1));
        assert!(!filter_in_range(usize::MAX, 1));
        assert!(!filter_in_range(1, usize::MAX));
    }

    #[test]
    fn test_delete_filtered_never_reaches_ptype() {
        let stmt = delete_filtered(Dialect::Sqlite, "casbin_rule", "p", usize::MAX, &["p".to_string()]);
        assert_eq!(stmt.sql, "DELETE FROM casbin_rule WHERE ptype = ?");
        assert_eq!(stmt.params.len(), 1);
    }

    #[test]
    fn test_delete_filtered_last_column() {
        let stmt = delete_filtered(Dialect::Sqlite, "casbin_rule", "p", 5, &["x".to_string()]);
        assert_eq!(stmt.sql, "DELETE FROM casbin_rule WHERE ptype = ? AND v5 = ?");
    }
}
