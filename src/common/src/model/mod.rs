pub mod game;
pub mod id;
pub mod locale;
