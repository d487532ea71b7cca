// ./crates/checkchain-axum/src/lib.rs

pub mod extract;
pub mod response;

// Re-export the core API so handlers can just `use checkchain_axum::*`
pub use extract::Validation;
pub use response::ValidationRejection;

pub use checkchain;
pub use checkchain::{checks, ValidationEngine};
