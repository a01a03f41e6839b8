use crate::Hand;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    PlayerWins,
    DealerWins,
    Push,
    PlayerBlackjack,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::PlayerWins => "Player wins",
            Outcome::DealerWins => "Dealer wins",
            Outcome::Push => "Push",
            Outcome::PlayerBlackjack => "Blackjack!",
        };
        f.write_str(text)
    }
}

/// Terminal facts about one hand, as the resolver needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandResult {
    pub score: u8,
    pub busted: bool,
    pub blackjack: bool,
}

impl HandResult {
    pub fn of(hand: &Hand) -> Self {
        Self {
            score: hand.value(),
            busted: hand.busted || hand.is_busted(),
            blackjack: hand.is_blackjack(),
        }
    }
}

/// Blackjack and bust checks short-circuit the numeric comparison, in this order.
pub fn resolve(player: HandResult, dealer: HandResult) -> Outcome {
    match (player.blackjack, dealer.blackjack) {
        (true, false) => return Outcome::PlayerBlackjack,
        (true, true) => return Outcome::Push,
        (false, true) => return Outcome::DealerWins,
        (false, false) => {}
    }
    if player.busted {
        return Outcome::DealerWins;
    }
    if dealer.busted {
        return Outcome::PlayerWins;
    }
    match player.score.cmp(&dealer.score) {
        std::cmp::Ordering::Greater => Outcome::PlayerWins,
        std::cmp::Ordering::Less => Outcome::DealerWins,
        std::cmp::Ordering::Equal => Outcome::Push,
    }
}

/// Verdict for a whole round; a split round carries one verdict per hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundOutcome {
    Single(Outcome),
    Split { main: Outcome, split: Outcome },
}

impl RoundOutcome {
    pub fn verdicts(&self) -> Vec<Outcome> {
        match *self {
            RoundOutcome::Single(outcome) => vec![outcome],
            RoundOutcome::Split { main, split } => vec![main, split],
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOutcome::Single(outcome) => write!(f, "{outcome}"),
            RoundOutcome::Split { main, split } => write!(f, "Left: {main} / Right: {split}"),
        }
    }
}
