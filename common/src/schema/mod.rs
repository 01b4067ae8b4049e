pub mod field_schema;
pub use field_schema::*;
