pub mod mirror;
pub mod sql;
