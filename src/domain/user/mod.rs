// User domain module
// Contains the user entity, input schemas, and value objects

#![allow(clippy::module_inception)]

pub mod user;
pub mod validation;
pub mod value_objects;

// Re-export main types for convenience
pub use user::User;
pub use validation::{CreateUser, UpdateUser, ValidationErrors};
pub use value_objects::Email;
