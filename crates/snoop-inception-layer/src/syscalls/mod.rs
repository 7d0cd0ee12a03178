pub mod open;
pub mod stdio;
