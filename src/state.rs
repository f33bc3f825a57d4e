use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

/// Card slots per hand. A hand can never need more: 21 aces already score 21.
pub const MAX_CARDS: usize = 21;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub denom: String,
    pub min_bet: Uint128,
    pub max_bet: Uint128,
    /// Oracle contract trusted to fulfill randomness requests.
    pub oracle: Addr,
    /// Gas the oracle should budget for the fulfillment callback.
    pub callback_gas_limit: u64,
    /// Seconds after which a player may cancel an unfulfilled request.
    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.denom.is_empty() {
            return Err(invalid_config("denom must not be empty"));
        }
        if self.min_bet.is_zero() {
            return Err(invalid_config("min_bet must be positive"));
        }
        if self.min_bet > self.max_bet {
            return Err(invalid_config("min_bet must not exceed max_bet"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(invalid_config("request_timeout_seconds must be positive"));
        }
        Ok(())
    }
}

fn invalid_config(reason: &str) -> ContractError {
    ContractError::InvalidConfig {
        reason: reason.to_string(),
    }
}

#[cw_serde]
#[derive(Default, Copy)]
pub enum GameState {
    #[default]
    Idle,
    InProgress,
    AwaitingRandomness,
    Finished,
}

#[cw_serde]
#[derive(Default, Copy)]
pub enum PendingAction {
    #[default]
    None,
    StartGame,
    Hit,
    Stand,
}

impl PendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingAction::None => "none",
            PendingAction::StartGame => "start_game",
            PendingAction::Hit => "hit",
            PendingAction::Stand => "stand",
        }
    }
}

/// Fixed-capacity hand. Unused slots hold `blackjack::EMPTY_SLOT`.
// `[u8; N]` has no `Schemaifier` impl, so `#[cw_serde]` is expanded by hand without it.
#[derive(
    cosmwasm_schema::serde::Serialize,
    cosmwasm_schema::serde::Deserialize,
    Clone,
    Debug,
    PartialEq,
    cosmwasm_schema::schemars::JsonSchema,
    Default,
)]
#[serde(crate = "cosmwasm_schema::serde")]
#[schemars(crate = "cosmwasm_schema::schemars")]
pub struct CardSlots {
    pub cards: [u8; MAX_CARDS],
    pub count: u8,
}

// `[u8; N]` has no `Schemaifier` impl, so `#[cw_serde]` is expanded by hand without it.
#[derive(
    cosmwasm_schema::serde::Serialize,
    cosmwasm_schema::serde::Deserialize,
    Clone,
    Debug,
    PartialEq,
    cosmwasm_schema::schemars::JsonSchema,
    Default,
)]
#[serde(crate = "cosmwasm_schema::serde")]
#[schemars(crate = "cosmwasm_schema::schemars")]
pub struct Table {
    pub player: Option<Addr>,
    pub wager: Uint128,
    pub player_cards: CardSlots,
    pub dealer_cards: CardSlots,
    pub game_state: GameState,
    pub pending_action: PendingAction,
    pub pending_request_id: Option<u64>,
    /// Block time (seconds) the pending request was issued at.
    pub requested_at: Option<u64>,
    pub is_first_round: bool,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const TABLES: Map<&Addr, Table> = Map::new("tables");
/// Pending request id -> player owning the table that issued it
pub const REQUESTS: Map<u64, Addr> = Map::new("requests");
pub const REQUEST_COUNTER: Item<u64> = Item::new("request_counter");
/// Sum of the largest possible payout of every active game
pub const OUTSTANDING_LIABILITY: Item<Uint128> = Item::new("outstanding_liability");
