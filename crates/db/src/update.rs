//! Partial `UPDATE` statement builder.
//!
//! Patch DTOs model every editable column as `Option<T>`: `None` leaves the
//! column untouched, `Some(value)` writes it (including `Some("")`). The
//! builder emits `SET` clauses only for present values, binds them
//! positionally, and refuses to produce a statement with nothing to set.

use fictsu_core::types::DbId;
use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Errors from building or running a partial update.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The patch had no present fields; nothing was sent to the database.
    #[error("No valid fields provided for update")]
    NoFieldsProvided,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Accumulates `column = $n` assignments for a single table.
pub struct UpdateBuilder<'args> {
    query: QueryBuilder<'args, Postgres>,
    fields: usize,
}

impl<'args> UpdateBuilder<'args> {
    /// Start an `UPDATE <table> SET` statement. `table` must be a trusted
    /// identifier, never user input.
    pub fn new(table: &str) -> Self {
        let mut query = QueryBuilder::new("UPDATE ");
        query.push(table).push(" SET ");
        Self { query, fields: 0 }
    }

    /// Add `column = $n` when `value` is present; no-op otherwise.
    pub fn set<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            if self.fields > 0 {
                self.query.push(", ");
            }
            self.query.push(column).push(" = ").push_bind(value);
            self.fields += 1;
        }
        self
    }

    /// Number of assignments added so far.
    pub fn field_count(&self) -> usize {
        self.fields
    }

    /// Append the `WHERE` predicate (`col = $n AND ...`) and return the
    /// finished statement.
    ///
    /// Fails with [`UpdateError::NoFieldsProvided`] if no assignment was
    /// added.
    pub fn finish(
        mut self,
        key: &[(&str, DbId)],
    ) -> Result<QueryBuilder<'args, Postgres>, UpdateError> {
        if self.fields == 0 {
            return Err(UpdateError::NoFieldsProvided);
        }
        self.query.push(" WHERE ");
        for (i, (column, value)) in key.iter().enumerate() {
            if i > 0 {
                self.query.push(" AND ");
            }
            self.query.push(*column).push(" = ").push_bind(*value);
        }
        Ok(self.query)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn only_present_fields_are_set() {
        let builder = UpdateBuilder::new("fictions")
            .set("title", Some("New"))
            .set::<&str>("subtitle", None)
            .set("status", Some("Hiatus"));
        assert_eq!(builder.field_count(), 2);

        let query = builder.finish(&[("id", 9)]).unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE fictions SET title = $1, status = $2 WHERE id = $3"
        );
    }

    #[test]
    fn empty_string_counts_as_present() {
        let query = UpdateBuilder::new("chapters")
            .set("content", Some(""))
            .finish(&[("fiction_id", 1), ("id", 2)])
            .unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE chapters SET content = $1 WHERE fiction_id = $2 AND id = $3"
        );
    }

    #[test]
    fn zero_fields_is_an_error() {
        let result = UpdateBuilder::new("fictions")
            .set::<String>("title", None)
            .finish(&[("id", 1)]);
        assert_matches!(result.map(|_| ()), Err(UpdateError::NoFieldsProvided));
    }
}
