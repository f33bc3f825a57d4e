#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Addr, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::contract::execute::house_balance;
use crate::msg::{HouseResponse, QueryMsg, RequestResponse, TableListItem, TableResponse};
use crate::state::{Config, CONFIG, OUTSTANDING_LIABILITY, REQUESTS, TABLES};
use crate::table::load_table;

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetConfig {} => to_json_binary(&query_config(deps)?),
        QueryMsg::GetTable { player } => to_json_binary(&query_table(deps, player)?),
        QueryMsg::GetPlayerCards { player } => {
            let table = load_table(deps.storage, &deps.api.addr_validate(&player)?)?;
            to_json_binary(&table.player_cards.cards.to_vec())
        }
        QueryMsg::GetDealerCards { player } => {
            let table = load_table(deps.storage, &deps.api.addr_validate(&player)?)?;
            to_json_binary(&table.dealer_cards.cards.to_vec())
        }
        QueryMsg::GetRequest { request_id } => to_json_binary(&query_request(deps, request_id)?),
        QueryMsg::GetHouse {} => to_json_binary(&query_house(deps, env)?),
        QueryMsg::ListTables { start_after, limit } => to_json_binary(&query_list_tables(deps, start_after, limit)?),
    }
}

fn query_config(deps: Deps) -> StdResult<Config> {
    CONFIG.load(deps.storage)
}

fn query_table(deps: Deps, player: String) -> StdResult<TableResponse> {
    let player_addr = deps.api.addr_validate(&player)?;
    let table = load_table(deps.storage, &player_addr)?;

    Ok(TableResponse {
        player: table.player.as_ref().map(Addr::to_string),
        wager: table.wager,
        player_cards: table.player_cards.cards.to_vec(),
        player_card_count: table.player_cards.count,
        player_score: table.player_cards.score(),
        dealer_cards: table.dealer_cards.cards.to_vec(),
        dealer_card_count: table.dealer_cards.count,
        dealer_score: table.dealer_cards.score(),
        game_state: table.game_state,
        pending_action: table.pending_action,
        pending_request_id: table.pending_request_id,
        requested_at: table.requested_at,
        is_first_round: table.is_first_round,
    })
}

fn query_request(deps: Deps, request_id: u64) -> StdResult<RequestResponse> {
    let player = REQUESTS.may_load(deps.storage, request_id)?;
    Ok(RequestResponse {
        request_id,
        player: player.map(|p| p.to_string()),
    })
}

fn query_house(deps: Deps, env: Env) -> StdResult<HouseResponse> {
    let config = CONFIG.load(deps.storage)?;
    let outstanding = OUTSTANDING_LIABILITY.may_load(deps.storage)?.unwrap_or_default();
    let balance = house_balance(deps, &env, &config).map_err(|e| StdError::msg(e.to_string()))?;

    Ok(HouseResponse {
        denom: config.denom,
        balance,
        outstanding_liability: outstanding,
        available: balance.saturating_sub(outstanding),
    })
}

fn query_list_tables(deps: Deps, start_after: Option<String>, limit: Option<u32>) -> StdResult<Vec<TableListItem>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_after = start_after.map(|p| deps.api.addr_validate(&p)).transpose()?;
    let start = start_after.as_ref().map(|p| Bound::exclusive(p));

    TABLES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (player, table) = item?;
            Ok(TableListItem {
                player: player.to_string(),
                wager: table.wager,
                game_state: table.game_state,
                pending_request_id: table.pending_request_id,
            })
        })
        .collect()
}
