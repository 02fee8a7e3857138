//! Form model shared by the create/update modal and the login screen

pub mod field;
pub mod schema;

pub use field::{FieldKind, FieldValidator, Form, FormField};
pub use schema::{SchemaCatalog, SchemaDoc};
