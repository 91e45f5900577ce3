pub mod cartridges;
pub mod clients;
pub mod health;
pub mod security;
pub mod tickets;
pub mod triggers;
pub mod workflows;
