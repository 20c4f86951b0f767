use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{Card, DeckVariant};
use crate::errors::GameError;

/// Seeded deck. The RNG carries over between shuffles, so a match seeded
/// once deals a reproducible sequence of rounds.
#[derive(Debug)]
pub struct Deck {
    variant: DeckVariant,
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// A standard 52-card deck.
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_variant(DeckVariant::Standard, seed)
    }

    pub fn with_variant(variant: DeckVariant, seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            variant,
            cards: variant.cards(),
            position: 0,
            rng,
        }
    }

    pub fn variant(&self) -> DeckVariant {
        self.variant
    }

    pub fn shuffle(&mut self) {
        self.cards = self.variant.cards();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        (0..n)
            .map(|_| self.deal_card().ok_or(GameError::DeckExhausted))
            .collect()
    }

    pub fn burn_card(&mut self) {
        let _ = self.deal_card();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

/// Everything dealt for one heads-up round: two hole cards per seat and the
/// full five-card board, revealed street by street by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Vec<Card>; 2],
    pub board: Vec<Card>,
}

impl Deal {
    /// Shuffles and deals a round with a burn before flop, turn and river.
    pub fn from_deck(deck: &mut Deck) -> Result<Self, GameError> {
        deck.shuffle();
        let mut first = Vec::with_capacity(2);
        let mut second = Vec::with_capacity(2);
        for _ in 0..2 {
            first.push(deck.deal_card().ok_or(GameError::DeckExhausted)?);
            second.push(deck.deal_card().ok_or(GameError::DeckExhausted)?);
        }
        let mut board = Vec::with_capacity(5);
        deck.burn_card();
        board.extend(deck.deal(3)?);
        deck.burn_card();
        board.extend(deck.deal(1)?);
        deck.burn_card();
        board.extend(deck.deal(1)?);
        Ok(Self {
            hands: [first, second],
            board,
        })
    }

    /// Board cards visible once `revealed` cards are out.
    pub fn visible_board(&self, revealed: usize) -> &[Card] {
        &self.board[..revealed.min(self.board.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deal_uses_unique_cards_and_burns_three() {
        let mut deck = Deck::new_with_seed(7);
        let deal = Deal::from_deck(&mut deck).expect("deal");
        let mut seen = HashSet::new();
        for card in deal.hands.iter().flatten().chain(deal.board.iter()) {
            assert!(seen.insert(*card), "duplicate {card}");
        }
        assert_eq!(deal.board.len(), 5);
        // 4 hole + 3 burns + 5 board
        assert_eq!(deck.remaining(), 52 - 12);
    }

    #[test]
    fn same_seed_replays_the_same_rounds() {
        let mut a = Deck::new_with_seed(99);
        let mut b = Deck::new_with_seed(99);
        for _ in 0..3 {
            assert_eq!(
                Deal::from_deck(&mut a).expect("deal"),
                Deal::from_deck(&mut b).expect("deal")
            );
        }
    }

    #[test]
    fn visible_board_follows_street_size() {
        let mut deck = Deck::new_with_seed(1);
        let deal = Deal::from_deck(&mut deck).expect("deal");
        assert!(deal.visible_board(0).is_empty());
        assert_eq!(deal.visible_board(3), &deal.board[..3]);
        assert_eq!(deal.visible_board(5).len(), 5);
    }

    #[test]
    fn short_deck_deals_only_six_and_up() {
        let mut deck = Deck::with_variant(DeckVariant::default(), 11);
        assert_eq!(deck.variant(), DeckVariant::Short);
        for _ in 0..20 {
            let deal = Deal::from_deck(&mut deck).expect("deal");
            let mut seen = HashSet::new();
            for card in deal.hands.iter().flatten().chain(deal.board.iter()) {
                assert!(card.rank >= crate::cards::Rank::Six, "{card}");
                assert!(seen.insert(*card), "duplicate {card}");
            }
            assert_eq!(deck.remaining(), 36 - 12);
        }
    }

    #[test]
    fn exhausted_deck_reports_error() {
        let mut deck = Deck::new_with_seed(3);
        deck.shuffle();
        assert_eq!(deck.deal(52).expect("full deck").len(), 52);
        assert_eq!(deck.deal(1), Err(GameError::DeckExhausted));
    }
}
