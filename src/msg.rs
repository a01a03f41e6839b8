use crate::scenario::Scenario;
use blackjack::{Card, GamePhase, RoundOutcome, SplitPrompt};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    // Start a round from Idle
    Deal {},
    // Player turn actions
    Hit {},
    Stand {},
    Split {},
    AcceptSplitPrompt { accept: bool },
    // Developer menu: cancels the live round and deals the scripted shoe
    SelectScenario { id: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Snapshot {},
    Scenarios {},
    Config {},
}

/// A dealer card as the player sees it. The hole card has no face until revealed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardView {
    pub card: Option<Card>,
    pub face_up: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub score: u8,
    pub soft: bool,
    pub busted: bool,
    pub stood: bool,
    pub blackjack: bool,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub phase: GamePhase,
    pub dealer_cards: Vec<CardView>,
    /// Score of the visible dealer cards only.
    pub dealer_score: u8,
    pub player_hands: Vec<HandView>,
    pub active_hand_index: usize,
    pub split_eligible: bool,
    pub split_performed: bool,
    pub split_prompt: SplitPrompt,
    pub dealer_peeking: bool,
    pub outcome: Option<RoundOutcome>,
    pub shoe_remaining: usize,
    pub scenario: Option<Scenario>,
    pub pending_steps: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub id: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Seat {
    Dealer,
    Player,
    Split,
}

/// Everything a presentation layer needs to animate a round, in order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TableEvent {
    PhaseChanged { phase: GamePhase },
    CardDealt { seat: Seat, card: Option<Card> },
    HoleCardRevealed { card: Card },
    PeekStarted,
    PeekFinished { dealer_blackjack: bool },
    SplitOffered,
    HandSplit,
    ActiveHandChanged { index: usize },
    RoundResolved { outcome: RoundOutcome },
    RoundAborted { reason: String },
    RoundReset,
    ShoeReshuffled { remaining: usize },
    ScenarioSelected { scenario: Option<Scenario> },
}
