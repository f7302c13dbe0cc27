mod table;

pub use table::{Column, ForeignKey, Schema, SqlType, Table};
