mod command;
mod query;
pub(crate) mod repository;
pub mod subscription;

pub use command::*;
pub use query::*;
