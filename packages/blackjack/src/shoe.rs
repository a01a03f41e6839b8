use crate::Card;
use rand::seq::SliceRandom;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Supply {
    /// Shuffled multi-deck shoe, rebuilt when it runs low.
    Shuffled { num_decks: u8, rng: ChaCha8Rng },
    /// Literal sequence dealt in order; never shuffled.
    Scripted { original: Vec<Card> },
}

/// The working supply of cards. Cards are dealt from the head.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: VecDeque<Card>,
    supply: Supply,
    reshuffles: u32,
}

impl Shoe {
    /// Build and shuffle `num_decks` packs from OS entropy.
    pub fn new(num_decks: u8) -> Self {
        Self::with_rng(num_decks, ChaCha8Rng::from_entropy())
    }

    /// Same as [`Shoe::new`] with a reproducible shuffle.
    pub fn seeded(num_decks: u8, seed: u64) -> Self {
        Self::with_rng(num_decks, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(num_decks: u8, rng: ChaCha8Rng) -> Self {
        let mut shoe = Self {
            cards: VecDeque::new(),
            supply: Supply::Shuffled { num_decks, rng },
            reshuffles: 0,
        };
        shoe.rebuild();
        shoe
    }

    /// A shoe that deals `cards` exactly in the given order.
    pub fn scripted(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.iter().copied().collect(),
            supply: Supply::Scripted { original: cards },
            reshuffles: 0,
        }
    }

    pub fn is_scripted(&self) -> bool {
        matches!(self.supply, Supply::Scripted { .. })
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Full size of the shoe right after a reset.
    pub fn capacity(&self) -> usize {
        match &self.supply {
            Supply::Shuffled { num_decks, .. } => 52 * *num_decks as usize,
            Supply::Scripted { original } => original.len(),
        }
    }

    /// Scripted shoes never reshuffle, so their threshold is zero.
    pub fn reshuffle_threshold(&self) -> usize {
        match &self.supply {
            Supply::Shuffled { .. } => self.capacity() / 3,
            Supply::Scripted { .. } => 0,
        }
    }

    /// Number of rebuilds since construction.
    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Remaining cards, head first.
    pub fn cards(&self) -> &VecDeque<Card> {
        &self.cards
    }

    /// Deal the head card, rebuilding a depleted shoe first.
    pub fn deal_one(&mut self) -> Option<Card> {
        if self.needs_reshuffle() {
            log::debug!(
                "Shoe below threshold ({} < {}), reshuffling",
                self.cards.len(),
                self.reshuffle_threshold()
            );
            self.reset();
        }
        self.cards.pop_front()
    }

    pub fn needs_reshuffle(&self) -> bool {
        !self.is_scripted() && self.cards.len() < self.reshuffle_threshold()
    }

    /// Rebuild and reshuffle a real shoe, or restore a scripted one.
    pub fn reset(&mut self) {
        if let Supply::Scripted { original } = &self.supply {
            self.cards = original.iter().copied().collect();
            return;
        }
        self.rebuild();
        self.reshuffles += 1;
    }

    fn rebuild(&mut self) {
        if let Supply::Shuffled { num_decks, rng } = &mut self.supply {
            let mut cards = Vec::with_capacity(52 * *num_decks as usize);
            for _ in 0..*num_decks {
                cards.extend((0..52).map(Card::from_index));
            }
            cards.shuffle(rng);
            self.cards = cards.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};
    use std::collections::HashMap;

    #[test]
    fn test_new_shoe_has_all_cards() {
        let shoe = Shoe::seeded(6, 7);
        assert_eq!(shoe.remaining(), 312);
        assert_eq!(shoe.capacity(), 312);
        assert_eq!(shoe.reshuffle_threshold(), 104);

        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in shoe.cards() {
            *counts.entry(*card).or_default() += 1;
        }
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 6));
    }

    #[test]
    fn test_seeded_shoes_are_reproducible() {
        let a = Shoe::seeded(2, 42);
        let b = Shoe::seeded(2, 42);
        let c = Shoe::seeded(2, 43);
        assert_eq!(a.cards(), b.cards());
        assert_ne!(a.cards(), c.cards());
    }

    #[test]
    fn test_deal_removes_head_card() {
        let mut shoe = Shoe::seeded(1, 1);
        let head = shoe.cards()[0];
        let second = shoe.cards()[1];
        assert_eq!(shoe.deal_one(), Some(head));
        assert_eq!(shoe.remaining(), 51);
        assert_eq!(shoe.cards()[0], second);
    }

    #[test]
    fn test_dealt_card_never_reappears_before_reset() {
        let mut shoe = Shoe::seeded(1, 9);
        let dealt = shoe.deal_one().unwrap();
        // One pack: the dealt card is unique, so it must be gone.
        assert!(!shoe.cards().contains(&dealt));
        // Deal down to the threshold without triggering a rebuild.
        while shoe.remaining() > shoe.reshuffle_threshold() {
            let card = shoe.deal_one().unwrap();
            assert_ne!(card, dealt);
        }
        assert_eq!(shoe.reshuffles(), 0);
    }

    #[test]
    fn test_reshuffles_below_threshold() {
        let mut shoe = Shoe::seeded(1, 3);
        // 52 -> 17 left, threshold is 17, no rebuild yet
        for _ in 0..35 {
            shoe.deal_one().unwrap();
        }
        assert_eq!(shoe.remaining(), 17);
        assert_eq!(shoe.reshuffles(), 0);

        shoe.deal_one().unwrap();
        assert_eq!(shoe.remaining(), 16);

        // Below threshold: rebuilt to 52, then one dealt
        shoe.deal_one().unwrap();
        assert_eq!(shoe.reshuffles(), 1);
        assert_eq!(shoe.remaining(), 51);
    }

    #[test]
    fn test_dealing_through_a_full_shoe_keeps_order() {
        let mut shoe = Shoe::seeded(6, 11);
        let expected: Vec<Card> = shoe.cards().iter().copied().collect();
        let threshold = shoe.reshuffle_threshold();

        let mut dealt = Vec::new();
        while shoe.remaining() >= threshold {
            dealt.push(shoe.deal_one().unwrap());
        }
        assert_eq!(dealt, expected[..dealt.len()]);
        assert_eq!(shoe.remaining(), threshold - 1);
        assert_eq!(shoe.reshuffles(), 0);
    }

    #[test]
    fn test_scripted_shoe_preserves_order() {
        let cards = vec![
            Card::new(Rank::Eight, Suit::Spades),
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Eight, Suit::Diamonds),
        ];
        let mut shoe = Shoe::scripted(cards.clone());
        assert!(shoe.is_scripted());
        assert_eq!(*shoe.cards(), cards);
        assert_eq!(shoe.deal_one(), Some(cards[0]));
        assert_eq!(shoe.deal_one(), Some(cards[1]));
        assert_eq!(shoe.deal_one(), Some(cards[2]));
        assert_eq!(shoe.deal_one(), None);
        assert_eq!(shoe.deal_one(), None);
        assert_eq!(shoe.reshuffles(), 0);
    }

    #[test]
    fn test_scripted_reset_restores_literal_sequence() {
        let cards: Vec<Card> = (0..10).map(Card::from_index).collect();
        let mut shoe = Shoe::scripted(cards.clone());
        for dealt in 0..=cards.len() {
            shoe.reset();
            for _ in 0..dealt {
                shoe.deal_one();
            }
            shoe.reset();
            assert_eq!(*shoe.cards(), cards);
        }
    }

    #[test]
    fn test_empty_scripted_shoe() {
        let mut shoe = Shoe::scripted(Vec::new());
        assert_eq!(shoe.remaining(), 0);
        assert_eq!(shoe.deal_one(), None);
    }

    #[test]
    fn test_real_reset_rebuilds_full_shoe() {
        let mut shoe = Shoe::seeded(2, 5);
        for _ in 0..20 {
            shoe.deal_one();
        }
        shoe.reset();
        assert_eq!(shoe.remaining(), 104);
        assert_eq!(shoe.reshuffles(), 1);
    }
}
