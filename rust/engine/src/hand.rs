//! Best-five-card ranking for showdown settlement and bot heuristics.

use std::cmp::Ordering;

use crate::cards::{Card, DeckVariant, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hands(self, other)
    }
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranks the best five-card hand among `cards` under standard rules. Fewer
/// than five cards are ranked on what is there (pairs, trips, high cards),
/// which is what a preflop or flop heuristic needs.
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    evaluate_hand_in(DeckVariant::Standard, cards)
}

/// Like [`evaluate_hand`], with straights as `variant` forms them: the ace
/// plays below the lowest rank of the deck (A-2-3-4-5, or A-6-7-8-9 short).
pub fn evaluate_hand_in(variant: DeckVariant, cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut by_suit: [Vec<u8>; 4] = [vec![], vec![], vec![], vec![]];
    for c in cards {
        let r = c.rank as u8;
        rank_counts[r as usize] += 1;
        by_suit[suit_index(c.suit)].push(r);
    }

    let flush_suit = by_suit.iter().position(|ranks| ranks.len() >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(&by_suit[s], variant) {
            return strength(Category::StraightFlush, &[high]);
        }
    }

    let groups = rank_groups(&rank_counts);
    let quads: Vec<u8> = groups.iter().filter(|g| g.1 == 4).map(|g| g.0).collect();
    let trips: Vec<u8> = groups.iter().filter(|g| g.1 == 3).map(|g| g.0).collect();
    let pairs: Vec<u8> = groups.iter().filter(|g| g.1 == 2).map(|g| g.0).collect();

    if let Some(&quad) = quads.first() {
        let mut k = vec![quad];
        k.extend(highest_excluding(&rank_counts, &[quad], 1));
        return strength(Category::FourOfAKind, &k);
    }

    if let Some(&trip) = trips.first() {
        // second set of trips plays as the pair
        let pair = trips.get(1).or(pairs.first()).copied();
        if let Some(pair) = pair {
            return strength(Category::FullHouse, &[trip, pair]);
        }
    }

    if let Some(s) = flush_suit {
        let mut ranks = by_suit[s].clone();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks.truncate(5);
        return strength(Category::Flush, &ranks);
    }

    let present: Vec<u8> = (2..=14u8).filter(|&r| rank_counts[r as usize] > 0).collect();
    if let Some(high) = straight_high(&present, variant) {
        return strength(Category::Straight, &[high]);
    }

    if let Some(&trip) = trips.first() {
        let mut k = vec![trip];
        k.extend(highest_excluding(&rank_counts, &[trip], 2));
        return strength(Category::ThreeOfAKind, &k);
    }
    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        let mut k = vec![high, low];
        k.extend(highest_excluding(&rank_counts, &[high, low], 1));
        return strength(Category::TwoPair, &k);
    }
    if let Some(&pair) = pairs.first() {
        let mut k = vec![pair];
        k.extend(highest_excluding(&rank_counts, &[pair], 3));
        return strength(Category::OnePair, &k);
    }

    strength(
        Category::HighCard,
        &highest_excluding(&rank_counts, &[], 5),
    )
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    compare_hands_in(DeckVariant::Standard, a, b)
}

/// Short deck has fewer cards of each suit, so a flush beats a full house.
pub fn compare_hands_in(variant: DeckVariant, a: &HandStrength, b: &HandStrength) -> Ordering {
    match category_rank(variant, a.category).cmp(&category_rank(variant, b.category)) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Compares two holdings sharing a board. `Greater` means `first` wins.
pub fn compare_holdings(first: &[Card], second: &[Card], board: &[Card]) -> Ordering {
    compare_holdings_in(DeckVariant::Standard, first, second, board)
}

pub fn compare_holdings_in(
    variant: DeckVariant,
    first: &[Card],
    second: &[Card],
    board: &[Card],
) -> Ordering {
    let a: Vec<Card> = first.iter().chain(board).copied().collect();
    let b: Vec<Card> = second.iter().chain(board).copied().collect();
    compare_hands_in(
        variant,
        &evaluate_hand_in(variant, &a),
        &evaluate_hand_in(variant, &b),
    )
}

fn category_rank(variant: DeckVariant, category: Category) -> u8 {
    match (variant, category) {
        (DeckVariant::Short, Category::Flush) => Category::FullHouse as u8,
        (DeckVariant::Short, Category::FullHouse) => Category::Flush as u8,
        (_, category) => category as u8,
    }
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, r) in kickers.iter_mut().zip(ranks) {
        *slot = *r;
    }
    HandStrength { category, kickers }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// (rank, count) for ranks held more than once, highest rank first.
fn rank_groups(rank_counts: &[u8; 15]) -> Vec<(u8, u8)> {
    (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] >= 2)
        .map(|r| (r, rank_counts[r as usize].min(4)))
        .collect()
}

fn highest_excluding(rank_counts: &[u8; 15], excluded: &[u8], n: usize) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|r| rank_counts[*r as usize] > 0 && !excluded.contains(r))
        .take(n)
        .collect()
}

fn straight_high(ranks: &[u8], variant: DeckVariant) -> Option<u8> {
    let mut mask: u16 = 0;
    for &r in ranks {
        mask |= 1 << r;
    }
    // Ace also plays just below the lowest rank
    let low_ace = variant.lowest_rank() as u8 - 1;
    if mask & (1 << 14) != 0 {
        mask |= 1 << low_ace;
    }
    (low_ace + 4..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        mask & window == window
    })
}
