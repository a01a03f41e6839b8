use super::Table;
use crate::msg::{CardView, HandView, QueryMsg, ScenarioInfo, TableSnapshot};
use crate::scenario::Scenario;
use blackjack::GamePhase;

impl Table {
    pub fn query(&self, msg: QueryMsg) -> serde_json::Result<String> {
        match msg {
            QueryMsg::Snapshot {} => serde_json::to_string(&self.snapshot()),
            QueryMsg::Scenarios {} => serde_json::to_string(&query_scenarios()),
            QueryMsg::Config {} => serde_json::to_string(&self.config),
        }
    }

    /// Read-only view of the table. The hole card and its points stay hidden
    /// until the dealer turns it.
    pub fn snapshot(&self) -> TableSnapshot {
        let round = &self.round;

        let dealer_cards = round
            .dealer_hand
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let face_up = index != 1 || round.hole_card_revealed;
                CardView {
                    card: face_up.then_some(*card),
                    face_up,
                }
            })
            .collect();

        let active_index = round.active_hand.index();
        let player_hands = round
            .player_hands()
            .into_iter()
            .enumerate()
            .map(|(index, hand)| HandView {
                cards: hand.cards.clone(),
                score: hand.value(),
                soft: hand.is_soft(),
                busted: hand.busted,
                stood: hand.stood,
                blackjack: hand.is_blackjack(),
                active: round.phase == GamePhase::PlayerTurn && index == active_index,
            })
            .collect();

        TableSnapshot {
            phase: round.phase,
            dealer_cards,
            dealer_score: round.dealer_visible_value(),
            player_hands,
            active_hand_index: active_index,
            split_eligible: round.split_eligible,
            split_performed: round.split_performed,
            split_prompt: round.split_prompt,
            dealer_peeking: round.dealer_peeking,
            outcome: round.outcome,
            shoe_remaining: self.shoe.remaining(),
            scenario: self.scenario,
            pending_steps: self.scheduler.len(),
        }
    }
}

fn query_scenarios() -> Vec<ScenarioInfo> {
    Scenario::ALL
        .iter()
        .map(|scenario| ScenarioInfo {
            id: scenario.id().to_string(),
            label: scenario.label().to_string(),
        })
        .collect()
}
