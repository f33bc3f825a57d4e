pub mod contract;
pub mod error;
pub mod msg;
pub mod oracle;
pub mod settlement;
pub mod state;
pub mod table;

pub use crate::error::ContractError;
