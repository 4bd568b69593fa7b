pub mod generation;
pub mod user;
