pub mod cooldown;
pub mod opponent;
pub mod session;
