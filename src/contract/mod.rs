pub mod execute;
pub mod fulfill;
pub mod instantiate;
pub mod query;


pub use crate::contract::execute::execute;
pub use crate::contract::instantiate::{instantiate, migrate};
pub use crate::contract::query::query;
