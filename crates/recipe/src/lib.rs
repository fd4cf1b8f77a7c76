mod command;
mod ingredient;
mod query;
pub mod relation;
pub mod shopping;

pub use command::*;
pub use ingredient::*;
pub use query::*;
