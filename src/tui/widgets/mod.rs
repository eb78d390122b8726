pub mod game;
pub mod help;
pub mod root;
pub mod setup;
pub mod summary;
