pub mod auth;
pub mod info;
pub mod listings;
