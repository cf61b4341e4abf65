//! Stored records and their write payloads.
//!
//! Each record kind has three shapes: the stored record (with id and
//! timestamps), an input payload deserialized from requests, and a
//! validated `New*` value that storage accepts.

pub mod customer_query;
pub mod gallery;
pub mod product;

pub use customer_query::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryInput, CustomerQueryPatch,
    CustomerQueryUpdate, NewCustomerQuery,
};
pub use gallery::{GalleryPost, GalleryPostInput, NewGalleryPost, parse_tags};
pub use product::{
    GENERAL_INQUIRY_NAME, NewProduct, Product, ProductInput, ProductPatch, is_reserved_name,
};
