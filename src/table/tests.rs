use super::*;
use crate::config::Speed;
use crate::error::TableError;
use crate::msg::{Command, QueryMsg, TableSnapshot};
use blackjack::{Card, Outcome, Rank, RoundOutcome, Suit};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn table_with(cards: &[(Rank, Suit)]) -> Table {
    let shoe = Shoe::scripted(cards.iter().map(|&(r, s)| card(r, s)).collect());
    Table::with_shoe(TableConfig::default(), shoe)
}

fn drain(rx: &mut UnboundedReceiver<TableEvent>) -> Vec<TableEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_initial_deal_is_paced() {
    let mut table = table_with(&[
        (Rank::Eight, Suit::Spades),
        (Rank::King, Suit::Hearts),
        (Rank::Eight, Suit::Diamonds),
        (Rank::Five, Suit::Clubs),
    ]);
    table.deal().unwrap();
    assert_eq!(table.round().phase, GamePhase::Dealing);
    assert_eq!(table.pending(), 1);
    assert_eq!(table.next_deadline(), Some(ms(300)));

    assert_eq!(table.advance(ms(299)), 0);
    assert!(table.round().player_hand.is_empty());

    assert_eq!(table.advance(ms(1)), 1);
    assert_eq!(table.round().player_hand.len(), 1);
    assert_eq!(table.round().dealer_hand.len(), 0);

    // Remaining three cards, then the peek is scheduled
    assert_eq!(table.advance(ms(900)), 3);
    assert_eq!(table.clock(), ms(1_200));
    assert!(table.round().dealer_peeking);
    assert_eq!(table.next_deadline(), Some(ms(1_500)));

    assert_eq!(table.advance(ms(300)), 1);
    let snapshot = table.snapshot();
    assert_eq!(snapshot.phase, GamePhase::PlayerTurn);
    assert!(snapshot.split_eligible);
    assert_eq!(snapshot.split_prompt, SplitPrompt::Offered);
    assert!(!snapshot.dealer_peeking);
    assert_eq!(snapshot.dealer_score, 10);
    assert_eq!(snapshot.dealer_cards[0].card, Some(card(Rank::King, Suit::Hearts)));
    assert_eq!(snapshot.dealer_cards[1].card, None);
    assert!(!snapshot.dealer_cards[1].face_up);
    assert_eq!(snapshot.player_hands[0].score, 16);
    assert!(snapshot.player_hands[0].active);
}

#[test]
fn test_commands_rejected_while_steps_pending() {
    let mut table = table_with(&[
        (Rank::Ten, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Six, Suit::Clubs),
        (Rank::Eight, Suit::Diamonds),
    ]);
    table.deal().unwrap();

    assert_eq!(table.hit(), Err(TableError::Busy { pending: 1 }));
    assert_eq!(table.deal(), Err(TableError::Busy { pending: 1 }));
    assert_eq!(table.round().phase, GamePhase::Dealing);

    table.settle();
    assert_eq!(table.round().phase, GamePhase::PlayerTurn);
    assert!(table.stand().is_ok());
}

#[test]
fn test_command_outside_phase() {
    let mut table = table_with(&[(Rank::Ten, Suit::Spades)]);
    assert_eq!(
        table.hit(),
        Err(TableError::Round(RoundError::WrongPhase {
            expected: GamePhase::PlayerTurn,
            actual: GamePhase::Idle,
        }))
    );
}

#[test]
fn test_settle_stops_before_reset() {
    let mut table = table_with(&[
        (Rank::Ace, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Queen, Suit::Clubs),
        (Rank::Four, Suit::Diamonds),
    ]);
    table.deal().unwrap();
    assert_eq!(table.settle(), 4);

    assert_eq!(table.round().phase, GamePhase::GameOver);
    assert_eq!(
        table.round().outcome,
        Some(RoundOutcome::Single(Outcome::PlayerBlackjack))
    );
    assert_eq!(table.scheduler.peek_task(), Some(Task::ResetRound));
    assert_eq!(table.deal(), Err(TableError::Busy { pending: 1 }));

    assert_eq!(table.step(), Some(Task::ResetRound));
    assert_eq!(table.round().phase, GamePhase::Idle);
    assert_eq!(table.round().outcome, None);
    assert_eq!(table.pending(), 0);
}

#[test]
fn test_event_stream_for_full_round() {
    let mut table = table_with(&[]);
    let mut rx = table.subscribe();

    table.select_scenario("dealerBust").unwrap();
    table.settle();
    table.stand().unwrap();
    table.settle();
    table.step();

    let dealer = Seat::Dealer;
    let player = Seat::Player;
    assert_eq!(
        drain(&mut rx),
        vec![
            TableEvent::PhaseChanged { phase: GamePhase::Idle },
            TableEvent::ScenarioSelected { scenario: Some(Scenario::DealerBust) },
            TableEvent::PhaseChanged { phase: GamePhase::Dealing },
            TableEvent::CardDealt { seat: player, card: Some(card(Rank::Ten, Suit::Spades)) },
            TableEvent::CardDealt { seat: dealer, card: Some(card(Rank::Six, Suit::Hearts)) },
            TableEvent::CardDealt { seat: player, card: Some(card(Rank::Nine, Suit::Clubs)) },
            TableEvent::CardDealt { seat: dealer, card: None },
            TableEvent::PhaseChanged { phase: GamePhase::PlayerTurn },
            TableEvent::HoleCardRevealed { card: card(Rank::Ten, Suit::Diamonds) },
            TableEvent::PhaseChanged { phase: GamePhase::DealerTurn },
            TableEvent::CardDealt { seat: dealer, card: Some(card(Rank::Eight, Suit::Clubs)) },
            TableEvent::PhaseChanged { phase: GamePhase::GameOver },
            TableEvent::RoundResolved { outcome: RoundOutcome::Single(Outcome::PlayerWins) },
            TableEvent::RoundReset,
            TableEvent::PhaseChanged { phase: GamePhase::Idle },
        ]
    );
}

#[test]
fn test_peek_and_split_events() {
    let mut table = table_with(&[]);
    table.select(Some(Scenario::SplitAvailable)).unwrap();
    let mut rx = table.subscribe();
    table.settle();

    let events = drain(&mut rx);
    assert!(events.contains(&TableEvent::PeekStarted));
    assert!(events.contains(&TableEvent::PeekFinished { dealer_blackjack: false }));
    assert_eq!(events.last(), Some(&TableEvent::PhaseChanged { phase: GamePhase::PlayerTurn }));
    assert!(events.contains(&TableEvent::SplitOffered));

    table.accept_split_prompt(true).unwrap();
    table.split().unwrap();
    table.settle();
    assert_eq!(
        drain(&mut rx),
        vec![
            TableEvent::HandSplit,
            TableEvent::CardDealt { seat: Seat::Player, card: Some(card(Rank::Three, Suit::Hearts)) },
            TableEvent::CardDealt { seat: Seat::Split, card: Some(card(Rank::Two, Suit::Diamonds)) },
        ]
    );

    // 8+3+10 stands itself at 21 and play moves to the split hand
    table.hit().unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![
            TableEvent::CardDealt { seat: Seat::Player, card: Some(card(Rank::Ten, Suit::Clubs)) },
            TableEvent::ActiveHandChanged { index: 1 },
        ]
    );
    let snapshot = table.snapshot();
    assert_eq!(snapshot.active_hand_index, 1);
    assert!(!snapshot.player_hands[0].active);
    assert!(snapshot.player_hands[1].active);
}

#[test]
fn test_split_round_resolves_per_hand() {
    let mut table = table_with(&[]);
    table.select(Some(Scenario::SplitAvailable)).unwrap();
    table.settle();
    table.accept_split_prompt(true).unwrap();
    assert_eq!(table.pending(), 0);
    table.split().unwrap();
    assert_eq!(table.hit(), Err(TableError::Busy { pending: 1 }));
    table.settle();

    let snapshot = table.snapshot();
    assert_eq!(snapshot.player_hands.len(), 2);
    assert_eq!(snapshot.player_hands[0].cards, vec![card(Rank::Eight, Suit::Spades), card(Rank::Three, Suit::Hearts)]);
    assert_eq!(snapshot.player_hands[1].cards, vec![card(Rank::Eight, Suit::Diamonds), card(Rank::Two, Suit::Diamonds)]);
    assert_eq!(snapshot.active_hand_index, 0);

    table.hit().unwrap();
    table.hit().unwrap();
    table.stand().unwrap();
    table.settle();

    assert_eq!(
        table.round().outcome,
        Some(RoundOutcome::Split {
            main: Outcome::PlayerWins,
            split: Outcome::PlayerWins,
        })
    );
    assert!(table.round().dealer_hand.busted);
}

#[test]
fn test_stale_epoch_continuation_is_dropped() {
    let mut table = table_with(&[
        (Rank::Ten, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Six, Suit::Clubs),
        (Rank::Eight, Suit::Diamonds),
    ]);
    table.deal().unwrap();
    let old_epoch = table.epoch;
    table.reset_round();
    table.deal().unwrap();

    table.scheduler.schedule(Duration::ZERO, old_epoch, Task::DealInitialCard);
    assert_eq!(table.step(), Some(Task::DealInitialCard));
    assert!(table.round().player_hand.is_empty());

    assert_eq!(table.step(), Some(Task::DealInitialCard));
    assert_eq!(table.round().player_hand.len(), 1);
}

#[test]
fn test_phase_mismatch_continuation_is_dropped() {
    let mut table = table_with(&[
        (Rank::Ten, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Six, Suit::Clubs),
        (Rank::Eight, Suit::Diamonds),
        (Rank::Two, Suit::Clubs),
    ]);
    table.deal().unwrap();
    table.settle();
    assert_eq!(table.round().phase, GamePhase::PlayerTurn);

    table.scheduler.schedule(Duration::ZERO, table.epoch, Task::DealerDraw);
    table.step();
    assert_eq!(table.round().dealer_hand.len(), 2);
    assert_eq!(table.shoe().remaining(), 1);
}

#[test]
fn test_initial_deal_exhaustion_aborts_round() {
    let mut table = table_with(&[
        (Rank::Ten, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Six, Suit::Clubs),
    ]);
    let mut rx = table.subscribe();
    table.deal().unwrap();
    table.settle();

    let events = drain(&mut rx);
    assert!(events.contains(&TableEvent::RoundAborted {
        reason: "Shoe has no cards left".to_string(),
    }));
    assert!(events.contains(&TableEvent::RoundReset));
    assert_eq!(table.round().phase, GamePhase::Idle);
    assert!(table.round().player_hand.is_empty());
    assert_eq!(table.pending(), 0);
}

#[test]
fn test_hit_on_empty_shoe_changes_nothing() {
    let mut table = table_with(&[
        (Rank::Ten, Suit::Spades),
        (Rank::Nine, Suit::Hearts),
        (Rank::Six, Suit::Clubs),
        (Rank::Eight, Suit::Diamonds),
    ]);
    table.deal().unwrap();
    table.settle();

    assert_eq!(table.hit(), Err(TableError::Round(RoundError::ShoeExhausted)));
    assert_eq!(table.round().player_hand.len(), 2);
    assert_eq!(table.round().phase, GamePhase::PlayerTurn);
}

#[test]
fn test_unknown_scenario_falls_back_to_shuffled_shoe() {
    let config = TableConfig {
        seed: Some(11),
        ..TableConfig::default()
    };
    let mut table = Table::new(config).unwrap();
    table.select(Some(Scenario::PushEqual)).unwrap();
    assert!(table.shoe().is_scripted());

    assert!(table.select_scenario("spaceships").is_ok());
    assert_eq!(table.scenario(), None);
    assert!(!table.shoe().is_scripted());
    assert_eq!(table.shoe().remaining(), 312);
    assert_eq!(table.round().phase, GamePhase::Idle);
    assert_eq!(table.pending(), 0);
}

#[test]
fn test_scenario_switch_cancels_live_round() {
    let mut table = table_with(&[]);
    table.select_scenario("dealerWins").unwrap();
    table.advance(ms(300));
    assert_eq!(table.round().player_hand.len(), 1);

    table.select_scenario("PUSHEQUAL").unwrap();
    assert_eq!(table.scenario(), Some(Scenario::PushEqual));
    assert!(table.round().player_hand.is_empty());
    assert_eq!(table.pending(), 1);

    table.settle();
    assert_eq!(
        table.round().player_hand.cards,
        vec![card(Rank::Ten, Suit::Spades), card(Rank::Eight, Suit::Clubs)]
    );
    table.stand().unwrap();
    table.settle();
    assert_eq!(table.round().outcome, Some(RoundOutcome::Single(Outcome::Push)));
}

#[test]
fn test_scripted_shoe_replays_after_round() {
    let mut table = table_with(&[]);
    table.select(Some(Scenario::PlayerBlackjack)).unwrap();
    table.settle();
    table.step();
    assert_eq!(table.shoe().remaining(), 0);

    table.deal().unwrap();
    assert_eq!(table.shoe().remaining(), 4);
    table.settle();
    assert_eq!(
        table.round().outcome,
        Some(RoundOutcome::Single(Outcome::PlayerBlackjack))
    );
}

#[test]
fn test_instant_pacing_runs_on_zero_advance() {
    let config = TableConfig {
        speed: Speed::Instant,
        ..TableConfig::default()
    };
    let mut table = Table::with_shoe(config, Scenario::PlayerBust.shoe());
    table.deal().unwrap();
    assert_eq!(table.advance(Duration::ZERO), 4);
    assert_eq!(table.round().phase, GamePhase::PlayerTurn);

    table.hit().unwrap();
    assert_eq!(table.round().phase, GamePhase::GameOver);
    assert_eq!(table.round().outcome, Some(RoundOutcome::Single(Outcome::DealerWins)));

    assert_eq!(table.advance(Duration::ZERO), 1);
    assert_eq!(table.round().phase, GamePhase::Idle);
}

#[test]
fn test_reshuffle_is_published() {
    let config = TableConfig {
        rules: blackjack::TableRules::single_deck(),
        ..TableConfig::default()
    };
    let mut table = Table::with_shoe(config, Shoe::seeded(1, 7));
    for _ in 0..36 {
        table.shoe.deal_one();
    }
    assert_eq!(table.shoe().remaining(), 16);

    let mut rx = table.subscribe();
    table.deal().unwrap();
    table.step();

    let events = drain(&mut rx);
    assert!(events.contains(&TableEvent::ShoeReshuffled { remaining: 51 }));
    assert_eq!(table.shoe().reshuffles(), 1);
}

#[test]
fn test_closed_subscribers_are_pruned() {
    let mut table = table_with(&[]);
    let rx = table.subscribe();
    let _live = table.subscribe();
    drop(rx);

    table.select(None).unwrap();
    assert_eq!(table.subscribers.len(), 1);
}

#[test]
fn test_execute_dispatches_json_commands() {
    let mut table = table_with(&[]);
    let command: Command =
        serde_json::from_str(r#"{"select_scenario":{"id":"dealerBlackjack"}}"#).unwrap();
    table.execute(command).unwrap();
    table.settle();

    assert_eq!(table.round().outcome, Some(RoundOutcome::Single(Outcome::DealerWins)));
    assert!(table.round().dealer_peeked);
    // Dealer blackjack ends the round before the player acts
    assert_eq!(table.round().player_hand.len(), 2);

    let hit: Command = serde_json::from_str(r#"{"hit":{}}"#).unwrap();
    assert_eq!(table.execute(hit), Err(TableError::Busy { pending: 1 }));
}

#[test]
fn test_snapshot_query_round_trips() {
    let mut table = table_with(&[]);
    table.select(Some(Scenario::InitialDeal)).unwrap();
    table.settle();

    let json = table.query(QueryMsg::Snapshot {}).unwrap();
    let snapshot: TableSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, table.snapshot());
    assert_eq!(snapshot.scenario, Some(Scenario::InitialDeal));
    assert!(snapshot.player_hands[0].soft);
    assert_eq!(snapshot.player_hands[0].score, 17);
    // Hole card never leaks into the serialized view
    assert!(!json.contains("\"three\""));

    let scenarios = table.query(QueryMsg::Scenarios {}).unwrap();
    assert!(scenarios.contains("splitWin"));
}
