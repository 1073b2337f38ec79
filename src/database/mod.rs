pub mod events;
pub mod manager;
pub mod models;
pub mod repos;
pub mod tickets;
pub mod users;
