mod ingredients;
mod migrate;
mod server;

pub use ingredients::load_ingredients;
pub use migrate::{migrate, reset};
pub use server::serve;
