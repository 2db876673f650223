pub mod commands;
pub mod gate;
pub mod reports;
pub mod shared;
