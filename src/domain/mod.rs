mod catalog;
mod records;
mod schema;

pub use catalog::{
    ADDRESS_INFORMATION, Catalog, CatalogError, PAYMENT_INFORMATION, USER_INFORMATION,
};
pub use records::{Record, SubmittedStore};
pub use schema::{FieldSchema, FieldType};
