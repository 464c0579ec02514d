//! Rule records: one row of the rule table.

use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::storage::schema::RULE_COLUMNS;

/// Maximum number of value fields a rule can carry (`v0`..`v5`).
///
/// Rule tuples longer than this are truncated when converted to a record.
pub const MAX_FIELDS: usize = 6;

/// Separator between tokens of a policy line.
pub const POLICY_LINE_SEPARATOR: &str = ", ";

/// A stored policy or grouping rule.
///
/// `fields[i]` maps to column `v{i}`. `None` means the column is `NULL`,
/// which is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Rule-type discriminator (`p`, `g`, `p2`, ...).
    pub ptype: String,
    /// Positional values.
    pub fields: [Option<String>; MAX_FIELDS],
}

impl RuleRecord {
    /// Build a record from a rule tuple, filling fields left to right.
    ///
    /// Elements beyond [`MAX_FIELDS`] are dropped.
    pub fn from_rule<S: AsRef<str>>(ptype: impl Into<String>, rule: &[S]) -> Self {
        let ptype = ptype.into();
        if rule.len() > MAX_FIELDS {
            tracing::warn!(
                ptype = %ptype,
                len = rule.len(),
                max = MAX_FIELDS,
                "Rule has more fields than the table stores; truncating"
            );
        }

        let mut fields: [Option<String>; MAX_FIELDS] = Default::default();
        for (slot, value) in fields.iter_mut().zip(rule) {
            *slot = Some(value.as_ref().to_string());
        }

        Self { ptype, fields }
    }

    /// Present fields, in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.as_deref())
    }

    /// Present fields as an owned rule tuple.
    pub fn to_rule(&self) -> Vec<String> {
        self.values().map(str::to_string).collect()
    }

    /// Render as a policy line: `ptype, v0, v1, ...`, skipping absent fields.
    pub fn to_policy_line(&self) -> String {
        std::iter::once(self.ptype.as_str())
            .chain(self.values())
            .collect::<Vec<_>>()
            .join(POLICY_LINE_SEPARATOR)
    }
}

impl FromRow<'_, AnyRow> for RuleRecord {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let mut fields: [Option<String>; MAX_FIELDS] = Default::default();
        for (slot, column) in fields.iter_mut().zip(&RULE_COLUMNS[1..]) {
            *slot = row.try_get(*column)?;
        }

        Ok(Self {
            ptype: row.try_get(RULE_COLUMNS[0])?,
            fields,
        })
    }
}
