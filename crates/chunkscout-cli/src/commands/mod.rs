pub mod categories;
pub mod find;
