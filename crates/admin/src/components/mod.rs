//! Reusable view components for the admin panel.

pub mod data_table;

pub use data_table::{Table, TableColumn, TableRow};
