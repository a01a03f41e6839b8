use blackjack::Card;
use blackjack_table::{CardView, HandView, Seat, TableEvent, TableSnapshot};

pub fn event_line(event: &TableEvent) -> String {
    match event {
        TableEvent::PhaseChanged { phase } => format!("-- {phase:?}"),
        TableEvent::CardDealt { seat, card } => match (seat, card) {
            (Seat::Dealer, Some(card)) => format!("Dealer draws {card}"),
            (Seat::Dealer, None) => "Dealer draws a face-down card".to_string(),
            (Seat::Player, Some(card)) => format!("You draw {card}"),
            (Seat::Split, Some(card)) => format!("Split hand draws {card}"),
            (_, None) => "A face-down card is dealt".to_string(),
        },
        TableEvent::HoleCardRevealed { card } => format!("Dealer turns over {card}"),
        TableEvent::PeekStarted => "Dealer checks for blackjack...".to_string(),
        TableEvent::PeekFinished { dealer_blackjack: true } => "Dealer has blackjack".to_string(),
        TableEvent::PeekFinished { dealer_blackjack: false } => "No dealer blackjack".to_string(),
        TableEvent::SplitOffered => "You have a pair. Split? (yes/no)".to_string(),
        TableEvent::HandSplit => "Hand split".to_string(),
        TableEvent::ActiveHandChanged { index } => format!("Playing hand {}", index + 1),
        TableEvent::RoundResolved { outcome } => format!("Result: {outcome}"),
        TableEvent::RoundAborted { reason } => format!("Round aborted: {reason}"),
        TableEvent::RoundReset => "Type 'deal' for the next round".to_string(),
        TableEvent::ShoeReshuffled { remaining } => format!("Shoe reshuffled, {remaining} cards"),
        TableEvent::ScenarioSelected { scenario: Some(scenario) } => {
            format!("Scenario: {}", scenario.label())
        }
        TableEvent::ScenarioSelected { scenario: None } => "Back to a shuffled shoe".to_string(),
    }
}

fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

fn dealer_cards(cards: &[CardView]) -> String {
    cards
        .iter()
        .map(|view| match view.card {
            Some(card) => card.to_display(),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn hand(view: &HandView) -> String {
    let marker = if view.active { ">" } else { " " };
    let soft = if view.soft && !view.busted { " soft" } else { "" };
    format!("{marker} {} ({}{soft})", cards(&view.cards), view.score)
}

pub fn status(snapshot: &TableSnapshot) -> String {
    let mut lines = vec![format!(
        "Dealer: {} ({})",
        dealer_cards(&snapshot.dealer_cards),
        snapshot.dealer_score
    )];
    lines.extend(snapshot.player_hands.iter().map(hand));
    lines.join("\n")
}
