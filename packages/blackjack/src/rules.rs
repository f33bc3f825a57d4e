use crate::hand::{calculate_hand_value, is_busted};

pub const BLACKJACK: u8 = 21;

/// The dealer draws below this value and stands on every 17, soft or hard.
pub const DEALER_STANDS_ON: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    PlayerWin,
    DealerWin,
    Push,
}

/// Whether the dealer has to take another card.
pub fn dealer_must_draw(dealer: &[u8]) -> bool {
    calculate_hand_value(dealer) < DEALER_STANDS_ON
}

/// Compare final hands. A player bust loses even if the dealer also busts.
pub fn determine_outcome(player: &[u8], dealer: &[u8]) -> HandOutcome {
    if is_busted(player) {
        return HandOutcome::DealerWin;
    }
    if is_busted(dealer) {
        return HandOutcome::PlayerWin;
    }

    let player_value = calculate_hand_value(player);
    let dealer_value = calculate_hand_value(dealer);
    if player_value > dealer_value {
        HandOutcome::PlayerWin
    } else if player_value == dealer_value {
        HandOutcome::Push
    } else {
        HandOutcome::DealerWin
    }
}
