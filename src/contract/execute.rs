#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{BankMsg, Coin, Deps, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::contract::fulfill::execute_fulfill_random_words;
use crate::error::ContractError;
use crate::msg::ExecuteMsg;
use crate::oracle::request_randomness;
use crate::settlement::{cancel_table, max_payout, reserve_liability, settle_table, Outcome};
use crate::state::{Config, GameState, PendingAction, CONFIG, OUTSTANDING_LIABILITY};
use crate::table::{load_table, save_table};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::StartGame {} => execute_start_game(deps, env, info),
        ExecuteMsg::Hit {} => execute_hit(deps, env, info),
        ExecuteMsg::Stand {} => execute_stand(deps, env, info),
        ExecuteMsg::Surrender {} => execute_surrender(deps, info),
        ExecuteMsg::CancelStuckRequest {} => execute_cancel_stuck_request(deps, env, info),
        ExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        } => execute_fulfill_random_words(deps, info, request_id, random_words),
        ExecuteMsg::FundHouse {} => execute_fund_house(deps, info),
        ExecuteMsg::WithdrawHouse { amount } => execute_withdraw_house(deps, env, info, amount),
        ExecuteMsg::UpdateConfig {
            admin,
            min_bet,
            max_bet,
            oracle,
            callback_gas_limit,
            request_timeout_seconds,
        } => execute_update_config(
            deps,
            info,
            ConfigUpdate {
                admin,
                min_bet,
                max_bet,
                oracle,
                callback_gas_limit,
                request_timeout_seconds,
            },
        ),
    }
}

pub fn execute_start_game(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut table = load_table(deps.storage, &info.sender)?;
    table.ensure_no_pending()?;
    table.ensure_idle()?;

    let wager = wager_from_funds(&info, &config)?;
    ensure_house_can_cover(deps.as_ref(), &env, &config, wager)?;
    reserve_liability(deps.storage, wager)?;

    table.begin(info.sender.clone(), wager);
    let request = request_randomness(
        deps.storage,
        &mut table,
        &info.sender,
        PendingAction::StartGame,
        &config,
        env.block.time.seconds(),
    )?;
    save_table(deps.storage, &info.sender, &table)?;

    Ok(Response::new()
        .add_message(request.msg)
        .add_event(request.event)
        .add_attribute("action", "start_game")
        .add_attribute("player", info.sender)
        .add_attribute("wager", wager)
        .add_attribute("request_id", request.request_id.to_string()))
}

pub fn execute_hit(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut table = load_table(deps.storage, &info.sender)?;
    table.ensure_no_pending()?;
    table.ensure_in_progress()?;
    if table.player_cards.is_full() {
        return Err(ContractError::HandFull {});
    }

    table.is_first_round = false;
    let request = request_randomness(
        deps.storage,
        &mut table,
        &info.sender,
        PendingAction::Hit,
        &config,
        env.block.time.seconds(),
    )?;
    save_table(deps.storage, &info.sender, &table)?;

    Ok(Response::new()
        .add_message(request.msg)
        .add_event(request.event)
        .add_attribute("action", "hit")
        .add_attribute("player", info.sender)
        .add_attribute("request_id", request.request_id.to_string()))
}

pub fn execute_stand(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut table = load_table(deps.storage, &info.sender)?;
    table.ensure_no_pending()?;
    table.ensure_in_progress()?;

    let request = request_randomness(
        deps.storage,
        &mut table,
        &info.sender,
        PendingAction::Stand,
        &config,
        env.block.time.seconds(),
    )?;
    save_table(deps.storage, &info.sender, &table)?;

    Ok(Response::new()
        .add_message(request.msg)
        .add_event(request.event)
        .add_attribute("action", "stand")
        .add_attribute("player", info.sender)
        .add_attribute("request_id", request.request_id.to_string()))
}

/// Give up the opening hand for half the wager. Settles at once.
pub fn execute_surrender(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut table = load_table(deps.storage, &info.sender)?;
    table.ensure_no_pending()?;
    table.ensure_in_progress()?;
    if !table.is_first_round {
        return Err(ContractError::NotInFirstRound {});
    }

    let response = Response::new()
        .add_attribute("action", "surrender")
        .add_attribute("player", info.sender.as_str());
    settle_table(deps.storage, &mut table, Outcome::Surrender, &config, response)
}

pub fn execute_cancel_stuck_request(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut table = load_table(deps.storage, &info.sender)?;
    if table.game_state != GameState::AwaitingRandomness {
        return Err(ContractError::NoPendingRequest {});
    }
    let (request_id, requested_at) = match (table.pending_request_id, table.requested_at) {
        (Some(id), Some(at)) => (id, at),
        _ => return Err(ContractError::NoPendingRequest {}),
    };

    let elapsed = env.block.time.seconds().saturating_sub(requested_at);
    let timeout = config.request_timeout_seconds;
    if elapsed < timeout {
        return Err(ContractError::RequestNotExpired {
            request_id,
            elapsed,
            timeout,
        });
    }

    let response = Response::new()
        .add_attribute("action", "cancel_stuck_request")
        .add_attribute("player", info.sender.as_str())
        .add_attribute("request_id", request_id.to_string());
    cancel_table(deps.storage, &mut table, &config, response)
}

/// Anyone may top up the bankroll.
pub fn execute_fund_house(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = single_coin(&info, &config.denom)?.ok_or_else(|| ContractError::InvalidFunds {
        denom: config.denom.clone(),
    })?;

    Ok(Response::new()
        .add_attribute("action", "fund_house")
        .add_attribute("funder", info.sender)
        .add_attribute("amount", amount))
}

/// Admin withdrawal of the bankroll not reserved by active games.
pub fn execute_withdraw_house(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {});
    }

    let available = available_bankroll(deps.as_ref(), &env, &config)?;
    let withdraw_amount = amount.unwrap_or(available);
    if withdraw_amount.is_zero() || withdraw_amount > available {
        return Err(ContractError::InsufficientHouseBalance {
            available,
            requested: withdraw_amount,
        });
    }
    let remaining = available.checked_sub(withdraw_amount)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: config.denom,
                amount: withdraw_amount.into(),
            }],
        })
        .add_attribute("action", "withdraw_house")
        .add_attribute("amount", withdraw_amount)
        .add_attribute("remaining", remaining))
}

pub struct ConfigUpdate {
    pub admin: Option<String>,
    pub min_bet: Option<Uint128>,
    pub max_bet: Option<Uint128>,
    pub oracle: Option<String>,
    pub callback_gas_limit: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
}

pub fn execute_update_config(deps: DepsMut, info: MessageInfo, update: ConfigUpdate) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {});
    }

    if let Some(admin) = update.admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(oracle) = update.oracle {
        config.oracle = deps.api.addr_validate(&oracle)?;
    }
    if let Some(min_bet) = update.min_bet {
        config.min_bet = min_bet;
    }
    if let Some(max_bet) = update.max_bet {
        config.max_bet = max_bet;
    }
    if let Some(gas) = update.callback_gas_limit {
        config.callback_gas_limit = gas;
    }
    if let Some(timeout) = update.request_timeout_seconds {
        config.request_timeout_seconds = timeout;
    }
    config.validate()?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("admin", config.admin)
        .add_attribute("oracle", config.oracle)
        .add_attribute("min_bet", config.min_bet)
        .add_attribute("max_bet", config.max_bet))
}

/// The wager is exactly the coin sent, never partially refunded.
fn wager_from_funds(info: &MessageInfo, config: &Config) -> Result<Uint128, ContractError> {
    let wager = single_coin(info, &config.denom)?.unwrap_or_default();
    if wager < config.min_bet {
        return Err(ContractError::InsufficientWager {
            wager,
            min_bet: config.min_bet,
        });
    }
    if wager > config.max_bet {
        return Err(ContractError::WagerAboveMaximum {
            wager,
            max_bet: config.max_bet,
        });
    }
    Ok(wager)
}

/// `None` when nothing was sent; anything but a single coin of `denom` is rejected.
fn single_coin(info: &MessageInfo, denom: &str) -> Result<Option<Uint128>, ContractError> {
    match info.funds.as_slice() {
        [] => Ok(None),
        [coin] if coin.denom == denom => Ok(Some(Uint128::try_from(coin.amount)?)),
        _ => Err(ContractError::InvalidFunds {
            denom: denom.to_string(),
        }),
    }
}

fn nonpayable(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::NonPayable {});
    }
    Ok(())
}

pub fn house_balance(deps: Deps, env: &Env, config: &Config) -> Result<Uint128, ContractError> {
    let coin = deps
        .querier
        .query_balance(env.contract.address.as_str(), config.denom.as_str())?;
    Ok(Uint128::try_from(coin.amount)?)
}

/// Balance minus what active games could still pay out.
pub fn available_bankroll(deps: Deps, env: &Env, config: &Config) -> Result<Uint128, ContractError> {
    let balance = house_balance(deps, env, config)?;
    let outstanding = OUTSTANDING_LIABILITY.may_load(deps.storage)?.unwrap_or_default();
    Ok(balance.saturating_sub(outstanding))
}

/// The balance already includes the incoming wager, so it has to cover the
/// full double payout on top of every active game.
fn ensure_house_can_cover(deps: Deps, env: &Env, config: &Config, wager: Uint128) -> Result<(), ContractError> {
    let required = max_payout(wager)?;
    let available = available_bankroll(deps, env, config)?;
    if available < required {
        return Err(ContractError::HouseCannotCover { required, available });
    }
    Ok(())
}
