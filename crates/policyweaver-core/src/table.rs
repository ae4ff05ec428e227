//! Source table → lakehouse path resolution

use policyweaver_model::MappedItem;

/// Resolves (catalog, schema, table) to a `Tables/<name>` path.
///
/// Pure lookup against the configured overrides; the first matching
/// override wins, otherwise the source table name passes through.
#[derive(Debug, Clone, Copy)]
pub struct TableMapper<'a> {
    mapped_items: &'a [MappedItem],
}

impl<'a> TableMapper<'a> {
    pub fn new(mapped_items: &'a [MappedItem]) -> Self {
        Self { mapped_items }
    }

    /// `None` when no table (or an empty table name) is given: the policy
    /// covers the whole catalog/schema and the caller uses the wildcard path.
    pub fn table_path(
        &self,
        catalog: &str,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Option<String> {
        let table = table.filter(|t| !t.is_empty())?;

        let name = self
            .mapped_items
            .iter()
            .find(|item| item.matches(catalog, schema, table))
            .map(|item| item.lakehouse_table_name.as_str())
            .unwrap_or(table);

        Some(format!("Tables/{}", name))
    }
}
