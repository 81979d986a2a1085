//! Data table component.
//!
//! Admin list pages share one table partial; handlers build a [`Table`] of
//! pre-rendered cells and the partial does the rest.

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// One rendered row; `href` (when non-empty) makes the first cell a link.
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub href: String,
    pub cells: Vec<String>,
}

/// A fully rendered table: headers plus rows of display cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table with the given columns.
    #[must_use]
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a plain row; trailing cells are padded so ragged data cannot
    /// skew the layout.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.push_linked_row(String::new(), cells);
    }

    /// Append a row whose first cell links to `href`.
    pub fn push_linked_row(&mut self, href: String, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        self.rows.push(TableRow { href, cells });
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = Table::new(vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("price", "Price"),
        ]);

        table.push_row(vec!["1".to_owned()]);
        table.push_linked_row(
            "/products/2/edit".to_owned(),
            vec![
                "2".to_owned(),
                "Диван".to_owned(),
                "12 000".to_owned(),
                "extra".to_owned(),
            ],
        );

        assert_eq!(table.rows.first().map(|r| r.cells.len()), Some(3));
        assert_eq!(table.rows.get(1).map(|r| r.cells.len()), Some(3));
        assert_eq!(
            table.rows.get(1).map(|r| r.href.as_str()),
            Some("/products/2/edit")
        );
        assert!(!table.is_empty());
    }
}
