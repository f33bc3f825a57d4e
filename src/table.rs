use blackjack::{
    calculate_hand_value, dealer_must_draw, determine_outcome, is_blackjack, is_busted, HandOutcome, EMPTY_SLOT,
};
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::oracle::{EntropyCursor, HIT_WORDS, START_GAME_WORDS};
use crate::state::{CardSlots, GameState, PendingAction, Table, MAX_CARDS, TABLES};

/// Result of resolving a fulfilled request against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Back to `InProgress`, waiting for the player's next action.
    Continue,
    Settle(HandOutcome),
}

impl CardSlots {
    pub fn push(&mut self, rank: u8) -> Result<(), ContractError> {
        let slot = self
            .cards
            .get_mut(self.count as usize)
            .ok_or(ContractError::HandFull {})?;
        *slot = rank;
        self.count += 1;
        Ok(())
    }

    pub fn ranks(&self) -> &[u8] {
        &self.cards[..self.count as usize]
    }

    pub fn is_full(&self) -> bool {
        self.count as usize >= MAX_CARDS
    }

    pub fn score(&self) -> u8 {
        calculate_hand_value(self.ranks())
    }

    /// Comma separated ranks, for event attributes.
    pub fn to_attribute(&self) -> String {
        self.ranks()
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn is_consistent(&self) -> bool {
        let count = self.count as usize;
        count <= MAX_CARDS
            && self.cards[..count].iter().all(|&r| r != EMPTY_SLOT)
            && self.cards[count..].iter().all(|&r| r == EMPTY_SLOT)
    }
}

impl Table {
    pub fn ensure_no_pending(&self) -> Result<(), ContractError> {
        if self.game_state == GameState::AwaitingRandomness {
            return Err(ContractError::RandomOperationAlreadyPending {});
        }
        Ok(())
    }

    pub fn ensure_idle(&self) -> Result<(), ContractError> {
        if self.game_state != GameState::Idle {
            return Err(ContractError::AlreadyInAGame {});
        }
        Ok(())
    }

    pub fn ensure_in_progress(&self) -> Result<(), ContractError> {
        if self.game_state != GameState::InProgress {
            return Err(ContractError::NotInAGame {});
        }
        Ok(())
    }

    /// Commit the wager and open a game. Only called on an idle table.
    pub fn begin(&mut self, player: Addr, wager: Uint128) {
        *self = Table {
            player: Some(player),
            wager,
            game_state: GameState::InProgress,
            ..Table::default()
        };
    }

    pub fn park(&mut self, request_id: u64, action: PendingAction, now: u64) {
        self.pending_request_id = Some(request_id);
        self.pending_action = action;
        self.requested_at = Some(now);
        self.game_state = GameState::AwaitingRandomness;
    }

    /// Leave `AwaitingRandomness` and hand back the action the request was for.
    pub fn resume(&mut self) -> Result<PendingAction, ContractError> {
        if self.game_state != GameState::AwaitingRandomness {
            return Err(ContractError::NoPendingRequest {});
        }
        let action = std::mem::take(&mut self.pending_action);
        if action == PendingAction::None {
            return Err(ContractError::NoPendingAction {});
        }
        self.pending_request_id = None;
        self.requested_at = None;
        self.game_state = GameState::InProgress;
        Ok(action)
    }

    /// Two cards to the player, one to the dealer. A natural settles at once:
    /// the dealer only holds an up card, so it cannot tie.
    pub fn deal_opening(&mut self, entropy: &mut EntropyCursor) -> Result<Resolution, ContractError> {
        entropy.require(START_GAME_WORDS)?;
        self.player_cards.push(entropy.next_rank()?)?;
        self.player_cards.push(entropy.next_rank()?)?;
        self.dealer_cards.push(entropy.next_rank()?)?;
        self.is_first_round = true;

        if is_blackjack(self.player_cards.ranks()) {
            return Ok(Resolution::Settle(determine_outcome(
                self.player_cards.ranks(),
                self.dealer_cards.ranks(),
            )));
        }
        Ok(Resolution::Continue)
    }

    pub fn draw_player(&mut self, entropy: &mut EntropyCursor) -> Result<Resolution, ContractError> {
        entropy.require(HIT_WORDS)?;
        self.player_cards.push(entropy.next_rank()?)?;

        if is_busted(self.player_cards.ranks()) {
            return Ok(Resolution::Settle(HandOutcome::DealerWin));
        }
        Ok(Resolution::Continue)
    }

    /// Dealer draws until 17 or more, then the hands are compared.
    pub fn play_dealer(&mut self, entropy: &mut EntropyCursor) -> Result<Resolution, ContractError> {
        while dealer_must_draw(self.dealer_cards.ranks()) {
            self.dealer_cards.push(entropy.next_rank()?)?;
        }
        Ok(Resolution::Settle(determine_outcome(
            self.player_cards.ranks(),
            self.dealer_cards.ranks(),
        )))
    }

    pub fn finish(&mut self) {
        self.game_state = GameState::Finished;
    }

    /// Every stored table must satisfy these.
    pub fn is_consistent(&self) -> bool {
        let awaiting = self.game_state == GameState::AwaitingRandomness;
        let active = self.game_state != GameState::Idle;
        self.pending_request_id.is_some() == awaiting
            && self.requested_at.is_some() == awaiting
            && (self.pending_action != PendingAction::None) == awaiting
            && !self.wager.is_zero() == active
            && self.player.is_some() == active
            && self.player_cards.is_consistent()
            && self.dealer_cards.is_consistent()
    }
}

/// Tables are created lazily: a player without a stored table has an idle one.
pub fn load_table(storage: &dyn Storage, player: &Addr) -> StdResult<Table> {
    Ok(TABLES.may_load(storage, player)?.unwrap_or_default())
}

/// Persist `table`; an idle table is recycled by dropping its entry.
pub fn save_table(storage: &mut dyn Storage, player: &Addr, table: &Table) -> StdResult<()> {
    debug_assert!(table.is_consistent(), "inconsistent table: {table:?}");
    if table.game_state == GameState::Idle {
        TABLES.remove(storage, player);
        return Ok(());
    }
    TABLES.save(storage, player, table)
}
