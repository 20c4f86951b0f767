use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Represents one of the four suits in a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs (`c`)
    Clubs,
    /// Diamonds (`d`)
    Diamonds,
    /// Hearts (`h`)
    Hearts,
    /// Spades (`s`)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    fn from_symbol(c: char) -> Option<Suit> {
        match c {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Rank from Two through Ace. Discriminants are the numeric values used by
/// hand evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub fn symbol(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    fn from_symbol(c: char) -> Option<Rank> {
        all_ranks().into_iter().find(|r| r.symbol() == c)
    }
}

/// A playing card. On the wire a card is the two-character token rank+suit,
/// e.g. `As`, `Td`, `2c`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => Rank::from_symbol(r).zip(Suit::from_symbol(s)),
            _ => None,
        };
        parsed
            .map(|(rank, suit)| Card { suit, rank })
            .ok_or_else(|| GameError::InvalidCard(token.to_string()))
    }
}

impl TryFrom<String> for Card {
    type Error = GameError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parses a list of wire tokens, failing on the first bad one.
pub fn parse_cards<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Card>, GameError> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

/// Renders cards as wire tokens.
pub fn to_tokens(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::to_string).collect()
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// Which cards a round is dealt from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckVariant {
    /// 36 cards, six through ace.
    #[default]
    Short,
    /// All 52 cards.
    Standard,
}

impl DeckVariant {
    pub fn lowest_rank(self) -> Rank {
        match self {
            DeckVariant::Short => Rank::Six,
            DeckVariant::Standard => Rank::Two,
        }
    }

    pub fn contains(self, card: Card) -> bool {
        card.rank >= self.lowest_rank()
    }

    /// Unshuffled cards of this deck, suit by suit.
    pub fn cards(self) -> Vec<Card> {
        full_deck()
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    pub fn size(self) -> usize {
        4 * all_ranks()
            .iter()
            .filter(|r| **r >= self.lowest_rank())
            .count()
    }
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}
