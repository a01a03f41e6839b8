use blackjack::{Card, Rank, Suit, Shoe};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named scripted shoes for exercising specific table situations.
/// Cards are dealt in order: player, dealer, player, dealer, then draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    InitialDeal,
    PlayerSixCards,
    PlayerBlackjack,
    DealerBlackjack,
    PushBlackjack,
    PlayerBust,
    DealerBust,
    DealerWins,
    PushEqual,
    SplitAvailable,
    SplitWin,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario '{0}'")]
pub struct UnknownScenario(pub String);

const fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::InitialDeal,
        Scenario::PlayerSixCards,
        Scenario::PlayerBlackjack,
        Scenario::DealerBlackjack,
        Scenario::PushBlackjack,
        Scenario::PlayerBust,
        Scenario::DealerBust,
        Scenario::DealerWins,
        Scenario::PushEqual,
        Scenario::SplitAvailable,
        Scenario::SplitWin,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Scenario::InitialDeal => "initialDeal",
            Scenario::PlayerSixCards => "playerSixCards",
            Scenario::PlayerBlackjack => "playerBlackjack",
            Scenario::DealerBlackjack => "dealerBlackjack",
            Scenario::PushBlackjack => "pushBlackjack",
            Scenario::PlayerBust => "playerBust",
            Scenario::DealerBust => "dealerBust",
            Scenario::DealerWins => "dealerWins",
            Scenario::PushEqual => "pushEqual",
            Scenario::SplitAvailable => "splitAvailable",
            Scenario::SplitWin => "splitWin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::InitialDeal => "Initial deal",
            Scenario::PlayerSixCards => "Player draws to six cards",
            Scenario::PlayerBlackjack => "Player blackjack",
            Scenario::DealerBlackjack => "Dealer blackjack",
            Scenario::PushBlackjack => "Both blackjack (push)",
            Scenario::PlayerBust => "Player busts on a hit",
            Scenario::DealerBust => "Dealer busts",
            Scenario::DealerWins => "Dealer wins on points",
            Scenario::PushEqual => "Push on equal totals",
            Scenario::SplitAvailable => "Pair of eights, split offered",
            Scenario::SplitWin => "Split, both hands win",
        }
    }

    pub fn cards(&self) -> Vec<Card> {
        use Rank::*;
        use Suit::*;

        match self {
            // Soft 17 against a King; spare cards for hitting
            Scenario::InitialDeal => vec![
                c(Ace, Spades),
                c(King, Hearts),
                c(Six, Clubs),
                c(Three, Diamonds),
                c(Five, Hearts),
                c(Ten, Clubs),
                c(Nine, Diamonds),
            ],
            // 2+3 against 17, four small hits reach 18
            Scenario::PlayerSixCards => vec![
                c(Two, Spades),
                c(Nine, Hearts),
                c(Three, Clubs),
                c(Eight, Diamonds),
                c(Two, Hearts),
                c(Two, Diamonds),
                c(Three, Hearts),
                c(Six, Spades),
            ],
            Scenario::PlayerBlackjack => vec![
                c(Ace, Spades),
                c(Nine, Hearts),
                c(Queen, Clubs),
                c(Four, Diamonds),
            ],
            Scenario::DealerBlackjack => vec![
                c(Nine, Spades),
                c(Ace, Hearts),
                c(Seven, Clubs),
                c(King, Diamonds),
            ],
            Scenario::PushBlackjack => vec![
                c(Ace, Spades),
                c(Ace, Hearts),
                c(King, Clubs),
                c(Queen, Diamonds),
            ],
            Scenario::PlayerBust => vec![
                c(Ten, Spades),
                c(Nine, Hearts),
                c(Six, Clubs),
                c(Eight, Diamonds),
                c(King, Clubs),
            ],
            Scenario::DealerBust => vec![
                c(Ten, Spades),
                c(Six, Hearts),
                c(Nine, Clubs),
                c(Ten, Diamonds),
                c(Eight, Clubs),
            ],
            Scenario::DealerWins => vec![
                c(Ten, Spades),
                c(Ten, Hearts),
                c(Seven, Clubs),
                c(Nine, Diamonds),
            ],
            Scenario::PushEqual => vec![
                c(Ten, Spades),
                c(Ten, Hearts),
                c(Eight, Clubs),
                c(Eight, Diamonds),
            ],
            Scenario::SplitAvailable => vec![
                c(Eight, Spades),
                c(King, Hearts),
                c(Eight, Diamonds),
                c(Five, Clubs),
                c(Three, Hearts),
                c(Two, Diamonds),
                c(Ten, Clubs),
                c(Nine, Spades),
                c(Seven, Hearts),
            ],
            // Nines against a dealer 16; both split hands make 19
            Scenario::SplitWin => vec![
                c(Nine, Spades),
                c(Six, Hearts),
                c(Nine, Diamonds),
                c(Ten, Clubs),
                c(Ten, Hearts),
                c(Jack, Diamonds),
                c(Ten, Spades),
            ],
        }
    }

    pub fn shoe(&self) -> Shoe {
        Shoe::scripted(self.cards())
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_parse_case_insensitively() {
        assert_eq!("splitWin".parse::<Scenario>(), Ok(Scenario::SplitWin));
        assert_eq!("SPLITWIN".parse::<Scenario>(), Ok(Scenario::SplitWin));
        assert_eq!(" dealerbust ".parse::<Scenario>(), Ok(Scenario::DealerBust));
        assert_eq!(
            "nope".parse::<Scenario>(),
            Err(UnknownScenario("nope".to_string()))
        );
    }

    #[test]
    fn test_unknown_scenario_is_an_error() {
        let err = "blackjackParty".parse::<Scenario>().unwrap_err();
        assert_eq!(err.to_string(), "unknown scenario 'blackjackParty'");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_every_scenario_round_trips_its_id() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.id().parse::<Scenario>(), Ok(scenario));
            assert_eq!(scenario.to_string(), scenario.id());
        }
    }

    #[test]
    fn test_sequences_cover_initial_deal() {
        for scenario in Scenario::ALL {
            assert!(
                scenario.cards().len() >= 4,
                "{scenario} must cover the initial deal"
            );
        }
    }

    #[test]
    fn test_sequences_do_not_repeat_cards() {
        for scenario in Scenario::ALL {
            let cards = scenario.cards();
            let unique: HashSet<_> = cards.iter().collect();
            assert_eq!(unique.len(), cards.len(), "{scenario} repeats a card");
        }
    }

    #[test]
    fn test_shoe_is_scripted() {
        let mut shoe = Scenario::PlayerBlackjack.shoe();
        assert!(shoe.is_scripted());
        assert_eq!(shoe.deal_one(), Some(Card::new(Rank::Ace, Suit::Spades)));
        assert_eq!(shoe.remaining(), 3);
    }
}
