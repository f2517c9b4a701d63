pub mod manager;
pub mod protected;
pub mod public;
