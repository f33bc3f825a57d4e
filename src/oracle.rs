use blackjack::rank_from_word;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Event, Storage, Uint256, WasmMsg};

use crate::error::ContractError;
use crate::state::{Config, PendingAction, Table, MAX_CARDS, REQUESTS, REQUEST_COUNTER};

pub const START_GAME_WORDS: u32 = 3;
pub const HIT_WORDS: u32 = 1;
/// Enough for the dealer to fill every slot behind the up card.
pub const STAND_WORDS: u32 = MAX_CARDS as u32 - 1;

/// Message accepted by the randomness oracle contract. The oracle answers with
/// `ExecuteMsg::FulfillRandomWords` carrying the same `request_id`.
#[cw_serde]
pub enum OracleExecuteMsg {
    RequestRandomWords {
        request_id: u64,
        num_words: u32,
        callback_gas_limit: u64,
    },
}

pub fn words_for(action: PendingAction) -> u32 {
    match action {
        PendingAction::StartGame => START_GAME_WORDS,
        PendingAction::Hit => HIT_WORDS,
        PendingAction::Stand => STAND_WORDS,
        PendingAction::None => 0,
    }
}

#[derive(Debug)]
pub struct RandomnessRequest {
    pub request_id: u64,
    pub msg: CosmosMsg,
    pub event: Event,
}

/// Park `table` on a fresh request id and build the outbound oracle call.
/// The caller persists the table.
pub fn request_randomness(
    storage: &mut dyn Storage,
    table: &mut Table,
    player: &Addr,
    action: PendingAction,
    config: &Config,
    now: u64,
) -> Result<RandomnessRequest, ContractError> {
    table.ensure_no_pending()?;

    let request_id = REQUEST_COUNTER.load(storage)?;
    REQUEST_COUNTER.save(storage, &(request_id + 1))?;
    REQUESTS.save(storage, request_id, player)?;
    table.park(request_id, action, now);

    let num_words = words_for(action);
    let msg = WasmMsg::Execute {
        contract_addr: config.oracle.to_string(),
        msg: to_json_binary(&OracleExecuteMsg::RequestRandomWords {
            request_id,
            num_words,
            callback_gas_limit: config.callback_gas_limit,
        })?,
        funds: vec![],
    };

    let event = Event::new("randomness_requested")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("action_kind", action.as_str())
        .add_attribute("player", player.as_str())
        .add_attribute("num_words", num_words.to_string());

    Ok(RandomnessRequest {
        request_id,
        msg: msg.into(),
        event,
    })
}

/// Reads oracle words strictly in array order. Word `i` always maps to the
/// same rank, so replaying identical entropy reproduces identical cards.
pub struct EntropyCursor<'a> {
    words: &'a [Uint256],
    position: usize,
}

impl<'a> EntropyCursor<'a> {
    pub fn new(words: &'a [Uint256]) -> Self {
        Self { words, position: 0 }
    }

    /// Fail before drawing anything if fewer than `count` words remain.
    pub fn require(&self, count: u32) -> Result<(), ContractError> {
        let needed = self.position + count as usize;
        if self.words.len() < needed {
            return Err(ContractError::InsufficientEntropy {
                required: needed as u32,
                supplied: self.words.len() as u32,
            });
        }
        Ok(())
    }

    pub fn next_rank(&mut self) -> Result<u8, ContractError> {
        self.require(1)?;
        let word = self.words[self.position];
        self.position += 1;
        Ok(rank_from_word(&word.to_be_bytes()))
    }

    pub fn consumed(&self) -> usize {
        self.position
    }
}
