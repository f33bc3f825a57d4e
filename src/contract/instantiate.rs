#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::msg::{InstantiateMsg, MigrateMsg};
use crate::state::{Config, CONFIG, OUTSTANDING_LIABILITY, REQUEST_COUNTER};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:vrf-blackjack";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

/// Stores the table limits and the oracle address. The sender becomes admin
/// and any funds sent along seed the house bankroll.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let config = Config {
        admin: info.sender.clone(),
        denom: msg.denom,
        min_bet: msg.min_bet,
        max_bet: msg.max_bet,
        oracle: deps.api.addr_validate(&msg.oracle)?,
        callback_gas_limit: msg.callback_gas_limit,
        request_timeout_seconds: msg
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
    };
    config.validate()?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(deps.storage, &config)?;
    REQUEST_COUNTER.save(deps.storage, &1)?;
    OUTSTANDING_LIABILITY.save(deps.storage, &Uint128::zero())?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", info.sender)
        .add_attribute("oracle", config.oracle)
        .add_attribute("denom", config.denom)
        .add_attribute("min_bet", config.min_bet)
        .add_attribute("max_bet", config.max_bet))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let previous = get_contract_version(deps.storage)?;
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("from_version", previous.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
