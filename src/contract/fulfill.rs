use cosmwasm_std::{DepsMut, Event, MessageInfo, Response, Uint256};

use crate::error::ContractError;
use crate::oracle::EntropyCursor;
use crate::settlement::settle_table;
use crate::state::{PendingAction, Table, CONFIG, REQUESTS};
use crate::table::{load_table, save_table, Resolution};

/// Oracle callback. Resumes the table parked on `request_id` and advances it
/// with the supplied words.
pub fn execute_fulfill_random_words(
    deps: DepsMut,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.oracle {
        return Err(ContractError::Unauthorized {});
    }

    let Some(player) = REQUESTS.may_load(deps.storage, request_id)? else {
        deps.api.debug(&format!("fulfillment for unknown request {request_id} ignored"));
        return Ok(ignored(request_id, "unknown_request"));
    };
    let mut table = load_table(deps.storage, &player)?;
    if table.pending_request_id != Some(request_id) {
        deps.api.debug(&format!("fulfillment for stale request {request_id} ignored"));
        return Ok(ignored(request_id, "stale_request"));
    }

    let action = table.resume()?;
    let mut entropy = EntropyCursor::new(&random_words);

    let resolution = match action {
        PendingAction::StartGame => table.deal_opening(&mut entropy)?,
        PendingAction::Hit => table.draw_player(&mut entropy)?,
        PendingAction::Stand => table.play_dealer(&mut entropy)?,
        PendingAction::None => return Err(ContractError::NoPendingAction {}),
    };
    REQUESTS.remove(deps.storage, request_id);

    let response = Response::new()
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("player", player.as_str())
        .add_attribute("words_used", entropy.consumed().to_string())
        .add_event(progress_event(action, &table, entropy.consumed()));

    match resolution {
        Resolution::Continue => {
            save_table(deps.storage, &player, &table)?;
            Ok(response)
        }
        Resolution::Settle(outcome) => settle_table(deps.storage, &mut table, outcome.into(), &config, response),
    }
}

fn progress_event(action: PendingAction, table: &Table, words_used: usize) -> Event {
    let player = table.player.as_ref().map(|p| p.as_str()).unwrap_or_default();
    match action {
        PendingAction::StartGame => Event::new("game_started")
            .add_attribute("player", player)
            .add_attribute("wager", table.wager)
            .add_attribute("player_cards", table.player_cards.to_attribute())
            .add_attribute("dealer_cards", table.dealer_cards.to_attribute())
            .add_attribute("player_score", table.player_cards.score().to_string()),
        PendingAction::Hit => {
            let card = table.player_cards.ranks().last().copied().unwrap_or_default();
            Event::new("player_hit")
                .add_attribute("player", player)
                .add_attribute("card", card.to_string())
                .add_attribute("player_score", table.player_cards.score().to_string())
        }
        PendingAction::Stand | PendingAction::None => Event::new("player_stand")
            .add_attribute("player", player)
            .add_attribute("dealer_cards", table.dealer_cards.to_attribute())
            .add_attribute("dealer_score", table.dealer_cards.score().to_string())
            .add_attribute("dealer_draws", words_used.to_string()),
    }
}

fn ignored(request_id: u64, reason: &str) -> Response {
    Response::new()
        .add_attribute("action", "fulfillment_ignored")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("reason", reason)
}
