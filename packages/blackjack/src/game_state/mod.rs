use crate::outcome::{resolve, HandResult, RoundOutcome};
use crate::{Card, Hand, Shoe, TableRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards in the initial deal: two each, player first.
pub const INITIAL_DEAL_CARDS: usize = 4;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Idle,
    Dealing,
    PlayerTurn,
    DealerTurn,
    GameOver,
}

/// Which of the player's hands is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandSlot {
    Main,
    Split,
}

impl HandSlot {
    pub fn index(&self) -> usize {
        match self {
            HandSlot::Main => 0,
            HandSlot::Split => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitPrompt {
    Hidden,
    Offered,
    Accepted,
    Declined,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Expected phase {expected:?}, round is in {actual:?}")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("Shoe has no cards left")]
    ShoeExhausted,
    #[error("Initial deal already complete")]
    InitialDealComplete,
    #[error("Dealer is not peeking")]
    NotPeeking,
    #[error("Split not allowed: {0}")]
    SplitNotAllowed(&'static str),
    #[error("No split prompt is open")]
    NoSplitPrompt,
    #[error("Split cards are still being dealt")]
    SplitInProgress,
    #[error("No split card is due")]
    NoSplitCardDue,
}

/// What the round needs next. Every variant except `AwaitPlayer` and
/// `Resolved` names a step the owner must run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Another initial card is due (`deal_initial_card`).
    DealInitial,
    /// Dealer shows an Ace or ten; `peek` is due.
    Peek,
    /// Waiting for a player command.
    AwaitPlayer,
    /// A split replacement card is due for this hand (`deal_split_card`).
    SplitCard(HandSlot),
    /// The dealer draw loop should run (`dealer_draw`).
    DealerDraw,
    /// Dealer is done; `settle` is due.
    Settle,
    /// The round is over.
    Resolved(RoundOutcome),
}

/// A single round: dealer hand, player hand(s) and the phase machine
/// that moves between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub rules: TableRules,
    pub phase: GamePhase,
    pub dealer_hand: Hand,
    pub player_hand: Hand,
    pub split_hand: Option<Hand>,
    pub active_hand: HandSlot,
    pub split_eligible: bool,
    pub split_performed: bool,
    pub split_prompt: SplitPrompt,
    pub pending_split_card: Option<HandSlot>,
    pub dealer_peeking: bool,
    pub dealer_peeked: bool,
    pub hole_card_revealed: bool,
    pub outcome: Option<RoundOutcome>,
}

impl Round {
    pub fn new(rules: TableRules) -> Self {
        Self {
            rules,
            phase: GamePhase::Idle,
            dealer_hand: Hand::new(),
            player_hand: Hand::new(),
            split_hand: None,
            active_hand: HandSlot::Main,
            split_eligible: false,
            split_performed: false,
            split_prompt: SplitPrompt::Hidden,
            pending_split_card: None,
            dealer_peeking: false,
            dealer_peeked: false,
            hole_card_revealed: false,
            outcome: None,
        }
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), RoundError> {
        if self.phase != expected {
            return Err(RoundError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn expect_player_action(&self) -> Result<(), RoundError> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        if self.pending_split_card.is_some() {
            return Err(RoundError::SplitInProgress);
        }
        Ok(())
    }

    pub fn hand(&self, slot: HandSlot) -> Option<&Hand> {
        match slot {
            HandSlot::Main => Some(&self.player_hand),
            HandSlot::Split => self.split_hand.as_ref(),
        }
    }

    fn hand_mut(&mut self, slot: HandSlot) -> &mut Hand {
        match slot {
            HandSlot::Main => &mut self.player_hand,
            HandSlot::Split => self.split_hand.get_or_insert_with(Hand::new),
        }
    }

    pub fn active(&self) -> &Hand {
        self.hand(self.active_hand).unwrap_or(&self.player_hand)
    }

    fn active_mut(&mut self) -> &mut Hand {
        self.hand_mut(self.active_hand)
    }

    /// Main hand first, then the split hand if there is one.
    pub fn player_hands(&self) -> Vec<&Hand> {
        let mut hands = vec![&self.player_hand];
        if let Some(split) = &self.split_hand {
            hands.push(split);
        }
        hands
    }

    pub fn initial_cards_dealt(&self) -> usize {
        if self.split_performed {
            return INITIAL_DEAL_CARDS;
        }
        (self.player_hand.len() + self.dealer_hand.len()).min(INITIAL_DEAL_CARDS)
    }

    pub fn dealer_upcard(&self) -> Option<&Card> {
        self.dealer_hand.cards.first()
    }

    /// Dealer cards the player can see: the upcard only until the hole card is turned.
    pub fn dealer_visible_cards(&self) -> &[Card] {
        if self.hole_card_revealed {
            &self.dealer_hand.cards
        } else {
            let shown = self.dealer_hand.len().min(1);
            &self.dealer_hand.cards[..shown]
        }
    }

    pub fn dealer_visible_value(&self) -> u8 {
        crate::calculate_hand_value(self.dealer_visible_cards())
    }

    pub fn dealer_value(&self) -> u8 {
        self.dealer_hand.value()
    }

    pub fn dealer_should_hit(&self) -> bool {
        let value = self.dealer_value();
        if value >= self.rules.dealer_stands_on {
            // Check for soft 17
            value == 17 && self.rules.dealer_hits_soft_17 && self.dealer_hand.is_soft()
        } else {
            true
        }
    }

    pub fn should_dealer_peek(&self) -> bool {
        if !self.rules.dealer_peeks || self.dealer_peeked {
            return false;
        }
        // Peek if dealer shows Ace or 10-value card
        match self.dealer_upcard() {
            Some(up_card) => up_card.is_ace() || up_card.rank.is_ten_valued(),
            None => false,
        }
    }

    pub fn dealer_has_blackjack(&self) -> bool {
        self.dealer_hand.is_blackjack()
    }

    /// Idle -> Dealing.
    pub fn start(&mut self) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::Idle)?;
        self.phase = GamePhase::Dealing;
        Ok(Step::DealInitial)
    }

    /// Deal the next initial card, alternating player and dealer.
    pub fn deal_initial_card(&mut self, shoe: &mut Shoe) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::Dealing)?;
        let dealt = self.initial_cards_dealt();
        if dealt >= INITIAL_DEAL_CARDS {
            return Err(RoundError::InitialDealComplete);
        }

        let card = shoe.deal_one().ok_or(RoundError::ShoeExhausted)?;
        if dealt % 2 == 0 {
            self.player_hand.add_card(card);
        } else {
            self.dealer_hand.add_card(card);
        }

        if dealt + 1 < INITIAL_DEAL_CARDS {
            return Ok(Step::DealInitial);
        }
        Ok(self.after_initial_deal())
    }

    fn after_initial_deal(&mut self) -> Step {
        self.split_eligible = self.player_hand.can_split();

        if self.player_hand.is_blackjack() {
            self.player_hand.stood = true;
            return self.resolve_now();
        }
        if self.should_dealer_peek() {
            self.dealer_peeking = true;
            return Step::Peek;
        }
        self.enter_player_turn()
    }

    /// Dealer checks the hole card for blackjack.
    pub fn peek(&mut self) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::Dealing)?;
        if !self.dealer_peeking {
            return Err(RoundError::NotPeeking);
        }
        self.dealer_peeking = false;
        self.dealer_peeked = true;

        if self.dealer_has_blackjack() {
            return Ok(self.resolve_now());
        }
        Ok(self.enter_player_turn())
    }

    fn enter_player_turn(&mut self) -> Step {
        self.phase = GamePhase::PlayerTurn;
        self.active_hand = HandSlot::Main;
        if self.split_eligible && !self.split_performed {
            self.split_prompt = SplitPrompt::Offered;
        }
        Step::AwaitPlayer
    }

    fn decline_open_prompt(&mut self) {
        if matches!(self.split_prompt, SplitPrompt::Offered | SplitPrompt::Accepted) {
            self.split_prompt = SplitPrompt::Declined;
            self.split_eligible = false;
        }
    }

    pub fn hit(&mut self, shoe: &mut Shoe) -> Result<Step, RoundError> {
        self.expect_player_action()?;
        let card = shoe.deal_one().ok_or(RoundError::ShoeExhausted)?;
        self.decline_open_prompt();
        self.active_mut().add_card(card);
        Ok(self.settle_active_hand())
    }

    pub fn stand(&mut self) -> Result<Step, RoundError> {
        self.expect_player_action()?;
        self.decline_open_prompt();
        self.active_mut().stood = true;
        Ok(self.advance_hand())
    }

    pub fn answer_split_prompt(&mut self, accept: bool) -> Result<(), RoundError> {
        self.expect_player_action()?;
        if self.split_prompt != SplitPrompt::Offered {
            return Err(RoundError::NoSplitPrompt);
        }
        if accept {
            self.split_prompt = SplitPrompt::Accepted;
        } else {
            self.split_prompt = SplitPrompt::Declined;
            self.split_eligible = false;
        }
        Ok(())
    }

    /// Move the second card into a new hand. Replacement cards follow as
    /// `SplitCard` steps, main hand first.
    pub fn split(&mut self) -> Result<Step, RoundError> {
        self.expect_player_action()?;
        if self.split_performed {
            return Err(RoundError::SplitNotAllowed("hand already split"));
        }
        if !self.split_eligible || !self.player_hand.can_split() {
            return Err(RoundError::SplitNotAllowed("hand is not a pair"));
        }
        if self.split_prompt != SplitPrompt::Accepted {
            return Err(RoundError::SplitNotAllowed("split prompt not accepted"));
        }

        let second_card = self
            .player_hand
            .cards
            .pop()
            .ok_or(RoundError::SplitNotAllowed("hand is not a pair"))?;
        self.split_hand = Some(Hand::from_cards(vec![second_card]));
        self.split_performed = true;
        self.split_eligible = false;
        self.split_prompt = SplitPrompt::Hidden;
        self.active_hand = HandSlot::Main;
        self.pending_split_card = Some(HandSlot::Main);
        Ok(Step::SplitCard(HandSlot::Main))
    }

    pub fn deal_split_card(&mut self, shoe: &mut Shoe) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        let slot = self.pending_split_card.ok_or(RoundError::NoSplitCardDue)?;
        let card = shoe.deal_one().ok_or(RoundError::ShoeExhausted)?;
        self.hand_mut(slot).add_card(card);

        match slot {
            HandSlot::Main => {
                self.pending_split_card = Some(HandSlot::Split);
                Ok(Step::SplitCard(HandSlot::Split))
            }
            HandSlot::Split => {
                self.pending_split_card = None;
                self.active_hand = HandSlot::Main;
                Ok(self.settle_active_hand())
            }
        }
    }

    /// A natural, a bust or an exact 21 finishes the active hand.
    fn settle_active_hand(&mut self) -> Step {
        let hand = self.active_mut();
        if hand.is_busted() {
            hand.busted = true;
            return self.advance_hand();
        }
        if hand.value() == 21 {
            hand.stood = true;
            return self.advance_hand();
        }
        Step::AwaitPlayer
    }

    fn advance_hand(&mut self) -> Step {
        if self.split_performed && self.active_hand == HandSlot::Main {
            self.active_hand = HandSlot::Split;
            return self.settle_active_hand();
        }
        self.end_player_turn()
    }

    fn end_player_turn(&mut self) -> Step {
        let nothing_to_compare = self
            .player_hands()
            .iter()
            .all(|h| h.busted || h.is_blackjack());
        if nothing_to_compare {
            return self.resolve_now();
        }
        self.phase = GamePhase::DealerTurn;
        self.hole_card_revealed = true;
        Step::DealerDraw
    }

    /// One pass of the dealer draw loop: at most one card per call.
    pub fn dealer_draw(&mut self, shoe: &mut Shoe) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::DealerTurn)?;
        if !self.dealer_should_hit() {
            return Ok(Step::Settle);
        }

        match shoe.deal_one() {
            Some(card) => {
                self.dealer_hand.add_card(card);
                if self.dealer_hand.is_busted() {
                    self.dealer_hand.busted = true;
                }
            }
            None => {
                log::warn!(
                    "Shoe ran out during dealer draw, dealer stands on {}",
                    self.dealer_value()
                );
                return Ok(Step::Settle);
            }
        }

        if self.dealer_should_hit() {
            Ok(Step::DealerDraw)
        } else {
            Ok(Step::Settle)
        }
    }

    /// DealerTurn -> GameOver.
    pub fn settle(&mut self) -> Result<Step, RoundError> {
        self.expect_phase(GamePhase::DealerTurn)?;
        Ok(self.resolve_now())
    }

    fn resolve_now(&mut self) -> Step {
        self.hole_card_revealed = true;
        self.dealer_peeking = false;
        self.pending_split_card = None;
        self.split_prompt = SplitPrompt::Hidden;

        let dealer = HandResult::of(&self.dealer_hand);
        let main = resolve(HandResult::of(&self.player_hand), dealer);
        let outcome = match &self.split_hand {
            Some(split) => RoundOutcome::Split {
                main,
                split: resolve(HandResult::of(split), dealer),
            },
            None => RoundOutcome::Single(main),
        };

        self.outcome = Some(outcome);
        self.phase = GamePhase::GameOver;
        Step::Resolved(outcome)
    }
}
