mod card;
mod hand;
mod rules;

pub use card::{rank_from_word, rank_value, ACE, EMPTY_SLOT, MAX_RANK};
pub use hand::{calculate_hand_value, is_blackjack, is_busted};
pub use rules::{dealer_must_draw, determine_outcome, HandOutcome, BLACKJACK, DEALER_STANDS_ON};
