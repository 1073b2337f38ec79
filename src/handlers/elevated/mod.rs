pub mod admin;
pub mod internal;
