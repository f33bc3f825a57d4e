use crate::card::{rank_value, ACE, EMPTY_SLOT};
use crate::rules::BLACKJACK;

/// Calculate the value of a blackjack hand of ranks. Empty slots are skipped,
/// so a fixed-size padded hand can be passed as is.
pub fn calculate_hand_value(ranks: &[u8]) -> u8 {
    let mut total: u16 = 0;
    let mut aces = 0;

    for &rank in ranks {
        if rank == ACE {
            aces += 1;
        }
        total += rank_value(rank) as u16;
    }

    // Adjust for aces
    while total > BLACKJACK as u16 && aces > 0 {
        total -= 10; // Count ace as 1 instead of 11
        aces -= 1;
    }

    total.min(u8::MAX as u16) as u8
}

/// Check if a hand is busted
pub fn is_busted(ranks: &[u8]) -> bool {
    calculate_hand_value(ranks) > BLACKJACK
}

/// Check if a hand is a natural (21 with 2 cards)
pub fn is_blackjack(ranks: &[u8]) -> bool {
    ranks.iter().filter(|&&r| r != EMPTY_SLOT).count() == 2 && calculate_hand_value(ranks) == BLACKJACK
}
