pub mod event;
pub mod repo;
pub mod ticket;
pub mod user;

pub use event::Event;
pub use repo::Repo;
pub use ticket::{Ticket, TicketPriority, TicketStatus};
pub use user::{LeaderboardEntry, User};
