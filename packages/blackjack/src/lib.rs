mod card;
mod game_state;
mod hand;
mod outcome;
mod rules;
mod shoe;

pub use card::{Card, Rank, Suit};
pub use game_state::{GamePhase, HandSlot, Round, RoundError, SplitPrompt, Step, INITIAL_DEAL_CARDS};
pub use hand::{calculate_hand_value, can_split_cards, is_blackjack, is_busted, is_soft_hand, Hand};
pub use outcome::{resolve, HandResult, Outcome, RoundOutcome};
pub use rules::{RulesError, TableRules, MAX_DECKS};
pub use shoe::Shoe;
