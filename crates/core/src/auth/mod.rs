//! Authentication primitives: password hashing and verification.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
