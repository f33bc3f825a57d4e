use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("A random operation is already pending for this table")]
    RandomOperationAlreadyPending {},

    #[error("Player is already in a game")]
    AlreadyInAGame {},

    #[error("Player is not in a game")]
    NotInAGame {},

    #[error("Surrender is only allowed before the first hit")]
    NotInFirstRound {},

    #[error("Wager {wager} is below the minimum of {min_bet}")]
    InsufficientWager { wager: Uint128, min_bet: Uint128 },

    #[error("Wager {wager} is above the maximum of {max_bet}")]
    WagerAboveMaximum { wager: Uint128, max_bet: Uint128 },

    #[error("Send exactly one coin of {denom}")]
    InvalidFunds { denom: String },

    #[error("This action does not accept funds")]
    NonPayable {},

    #[error("House cannot cover a payout of {required}. Available: {available}")]
    HouseCannotCover { required: Uint128, available: Uint128 },

    #[error("Insufficient entropy. Required: {required}, Supplied: {supplied}")]
    InsufficientEntropy { required: u32, supplied: u32 },

    #[error("Table is awaiting randomness without a pending action")]
    NoPendingAction {},

    #[error("Hand is full")]
    HandFull {},

    #[error("No randomness request is pending")]
    NoPendingRequest {},

    #[error("Request {request_id} has not expired. Elapsed: {elapsed}s, Required: {timeout}s")]
    RequestNotExpired {
        request_id: u64,
        elapsed: u64,
        timeout: u64,
    },

    #[error("Insufficient house balance. Available: {available}, Requested: {requested}")]
    InsufficientHouseBalance {
        available: Uint128,
        requested: Uint128,
    },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}
