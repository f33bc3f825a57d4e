use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Uint128, Uint256};

use crate::state::{Config, GameState, PendingAction};

#[cw_serde]
pub struct InstantiateMsg {
    pub denom: String,
    pub min_bet: Uint128,
    pub max_bet: Uint128,
    pub oracle: String,
    pub callback_gas_limit: u64,
    /// Defaults to one hour.
    pub request_timeout_seconds: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    // Player actions. The wager is the single coin sent with StartGame.
    StartGame {},
    Hit {},
    Stand {},
    Surrender {},
    /// Refund a table whose randomness request timed out.
    CancelStuckRequest {},

    // Oracle callback
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },

    // House management
    FundHouse {},
    WithdrawHouse {
        amount: Option<Uint128>,
    },
    UpdateConfig {
        admin: Option<String>,
        min_bet: Option<Uint128>,
        max_bet: Option<Uint128>,
        oracle: Option<String>,
        callback_gas_limit: Option<u64>,
        request_timeout_seconds: Option<u64>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    GetConfig {},
    #[returns(TableResponse)]
    GetTable { player: String },
    /// All 21 slots, zero padded.
    #[returns(Vec<u8>)]
    GetPlayerCards { player: String },
    #[returns(Vec<u8>)]
    GetDealerCards { player: String },
    #[returns(RequestResponse)]
    GetRequest { request_id: u64 },
    #[returns(HouseResponse)]
    GetHouse {},
    #[returns(Vec<TableListItem>)]
    ListTables {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct TableResponse {
    pub player: Option<String>,
    pub wager: Uint128,
    pub player_cards: Vec<u8>,
    pub player_card_count: u8,
    pub player_score: u8,
    pub dealer_cards: Vec<u8>,
    pub dealer_card_count: u8,
    pub dealer_score: u8,
    pub game_state: GameState,
    pub pending_action: PendingAction,
    pub pending_request_id: Option<u64>,
    pub requested_at: Option<u64>,
    pub is_first_round: bool,
}

#[cw_serde]
pub struct RequestResponse {
    pub request_id: u64,
    /// Owner of the table waiting on this request, if it is still pending.
    pub player: Option<String>,
}

#[cw_serde]
pub struct HouseResponse {
    pub denom: String,
    pub balance: Uint128,
    pub outstanding_liability: Uint128,
    pub available: Uint128,
}

#[cw_serde]
pub struct TableListItem {
    pub player: String,
    pub wager: Uint128,
    pub game_state: GameState,
    pub pending_request_id: Option<u64>,
}
