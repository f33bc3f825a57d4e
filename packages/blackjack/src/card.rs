/// Slot value for "no card". Ranks start at 1 so a zeroed slot is never a card.
pub const EMPTY_SLOT: u8 = 0;
pub const ACE: u8 = 1;
pub const MAX_RANK: u8 = 13;

/// Blackjack value of a single rank. Aces count 11 here; hand evaluation
/// reduces them to 1 when needed.
pub fn rank_value(rank: u8) -> u8 {
    match rank {
        EMPTY_SLOT => 0,
        ACE => 11,
        2..=10 => rank,
        _ => 10, // Jack, Queen, King
    }
}

/// Reduce a big-endian 256-bit random word to a rank in `1..=13`
/// (`word % 13 + 1`).
pub fn rank_from_word(word: &[u8; 32]) -> u8 {
    let rem = word
        .iter()
        .fold(0u32, |acc, &byte| (acc * 256 + byte as u32) % MAX_RANK as u32);
    rem as u8 + 1
}
