use blackjack::HandOutcome;
use cosmwasm_std::{Addr, BankMsg, Event, Response, Storage, Uint128};

use crate::error::ContractError;
use crate::state::{Config, Table, OUTSTANDING_LIABILITY, REQUESTS, TABLES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerWin,
    DealerWin,
    Push,
    /// Player gave up half the wager on the opening hand.
    Surrender,
}

impl From<HandOutcome> for Outcome {
    fn from(outcome: HandOutcome) -> Self {
        match outcome {
            HandOutcome::PlayerWin => Outcome::PlayerWin,
            HandOutcome::DealerWin => Outcome::DealerWin,
            HandOutcome::Push => Outcome::Push,
        }
    }
}

impl Outcome {
    pub fn event_type(&self) -> &'static str {
        match self {
            Outcome::PlayerWin => "player_win",
            Outcome::DealerWin | Outcome::Surrender => "player_lose",
            Outcome::Push => "player_draw",
        }
    }
}

/// Amount sent back to the player, wager included.
pub fn payout(outcome: Outcome, wager: Uint128) -> Result<Uint128, ContractError> {
    let amount = match outcome {
        Outcome::PlayerWin => wager.checked_mul(Uint128::new(2))?,
        Outcome::Push => wager,
        Outcome::DealerWin => Uint128::zero(),
        Outcome::Surrender => Uint128::new(wager.u128() / 2),
    };
    Ok(amount)
}

/// Largest amount a game with this wager can pay out.
pub fn max_payout(wager: Uint128) -> Result<Uint128, ContractError> {
    payout(Outcome::PlayerWin, wager)
}

pub fn reserve_liability(storage: &mut dyn Storage, wager: Uint128) -> Result<Uint128, ContractError> {
    let outstanding = OUTSTANDING_LIABILITY
        .may_load(storage)?
        .unwrap_or_default()
        .checked_add(max_payout(wager)?)?;
    OUTSTANDING_LIABILITY.save(storage, &outstanding)?;
    Ok(outstanding)
}

pub fn release_liability(storage: &mut dyn Storage, wager: Uint128) -> Result<Uint128, ContractError> {
    let outstanding = OUTSTANDING_LIABILITY
        .may_load(storage)?
        .unwrap_or_default()
        .checked_sub(max_payout(wager)?)?;
    OUTSTANDING_LIABILITY.save(storage, &outstanding)?;
    Ok(outstanding)
}

/// Close out a finished hand: reset the table, then queue the transfer.
///
/// The bank message only runs after this handler returns, and a failed
/// transfer reverts the reset with it.
pub fn settle_table(
    storage: &mut dyn Storage,
    table: &mut Table,
    outcome: Outcome,
    config: &Config,
    response: Response,
) -> Result<Response, ContractError> {
    let player = table.player.clone().ok_or(ContractError::NotInAGame {})?;
    let wager = table.wager;
    let amount = payout(outcome, wager)?;

    table.finish();
    release_liability(storage, wager)?;
    TABLES.remove(storage, &player);

    let mut event = Event::new(outcome.event_type())
        .add_attribute("player", player.as_str())
        .add_attribute("player_cards", table.player_cards.to_attribute())
        .add_attribute("player_score", table.player_cards.score().to_string())
        .add_attribute("dealer_cards", table.dealer_cards.to_attribute())
        .add_attribute("dealer_score", table.dealer_cards.score().to_string())
        .add_attribute("wager", wager)
        .add_attribute("payout", amount);
    if outcome == Outcome::Surrender {
        event = event.add_attribute("surrendered", "true");
    }

    *table = Table::default();
    let response = response.add_event(event);
    Ok(attach_payout(response, &player, amount, config))
}

/// Refund the full wager of a table whose request was never fulfilled.
pub fn cancel_table(
    storage: &mut dyn Storage,
    table: &mut Table,
    config: &Config,
    response: Response,
) -> Result<Response, ContractError> {
    let player = table.player.clone().ok_or(ContractError::NotInAGame {})?;
    let request_id = table.pending_request_id.ok_or(ContractError::NoPendingRequest {})?;
    let wager = table.wager;

    release_liability(storage, wager)?;
    REQUESTS.remove(storage, request_id);
    TABLES.remove(storage, &player);
    *table = Table::default();

    let event = Event::new("request_cancelled")
        .add_attribute("player", player.as_str())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("refund", wager);
    Ok(attach_payout(response.add_event(event), &player, wager, config))
}

fn attach_payout(response: Response, player: &Addr, amount: Uint128, config: &Config) -> Response {
    if amount.is_zero() {
        return response;
    }
    response.add_message(BankMsg::Send {
        to_address: player.to_string(),
        amount: vec![cosmwasm_std::Coin {
            denom: config.denom.clone(),
            amount: amount.into(),
        }],
    })
}
