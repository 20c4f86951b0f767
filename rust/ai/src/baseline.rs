//! Rule-based strategy: preflop hand table, postflop made-hand category and
//! pot odds. Deterministic, so a replayed request gets the same answer.

use pokerbot_engine::actions::PlayerAction;
use pokerbot_engine::cards::{Card, DeckVariant};
use pokerbot_engine::hand::{evaluate_hand_in, Category};
use pokerbot_engine::rules::Street;

use crate::{Observation, RoundSummary, Strategy, StrategyError};

#[derive(Debug, Clone, Default)]
pub struct BaselineStrategy {
    opponents: Vec<String>,
}

impl BaselineStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preflop strength on a 0-10 scale.
    ///
    /// - 9-10: premium (AA-JJ, AKs)
    /// - 7-8: strong (TT-99, AK, AQ, KQs)
    /// - 5-6: playable (88-77, AJ, suited connectors)
    /// - 0-4: marginal to weak
    pub fn preflop_strength(c1: Card, c2: Card) -> u8 {
        let r1 = c1.rank as u8;
        let r2 = c2.rank as u8;
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = c1.suit == c2.suit;
        let pick = |s: u8, o: u8| if suited { s } else { o };

        if r1 == r2 {
            return match high {
                13..=14 => 10,
                11..=12 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }

        match (high, low) {
            (14, 13) => pick(10, 8),
            (14, 12) => pick(8, 7),
            (14, 11) => pick(7, 6),
            (14, 10) => pick(6, 5),
            (14, _) => pick(5, 4),
            (13, 12) => pick(7, 6),
            (13, 11) => pick(6, 5),
            (13, 10) => pick(5, 4),
            (12, 11) => pick(6, 5),
            (12, 10) => pick(5, 4),
            _ if suited && high - low <= 2 => {
                if high >= 9 {
                    5
                } else {
                    4
                }
            }
            _ if high >= 11 && low >= 9 => 4,
            _ => 2,
        }
    }

    /// Postflop strength from the made hand.
    pub fn postflop_strength(deck: DeckVariant, hole: &[Card], board: &[Card]) -> u8 {
        let cards: Vec<Card> = hole.iter().chain(board).copied().collect();
        let strength = evaluate_hand_in(deck, &cards);
        let base = match (strength.category, deck) {
            (Category::HighCard, _) => 1,
            (Category::OnePair, _) => 3,
            (Category::TwoPair, _) => 5,
            (Category::ThreeOfAKind, _) => 6,
            (Category::Straight, _) => 7,
            (Category::Flush, DeckVariant::Standard) | (Category::FullHouse, DeckVariant::Short) => 8,
            (Category::FullHouse, DeckVariant::Standard) | (Category::Flush, DeckVariant::Short) => 9,
            (Category::FourOfAKind | Category::StraightFlush, _) => 10,
        };
        let kicker_boost = u8::from(strength.kickers[0] >= 12);
        (base + kicker_boost).min(10)
    }

    fn pot_odds(pot: u32, cost: u32) -> f32 {
        if cost == 0 {
            return 1.0;
        }
        pot as f32 / (pot + cost) as f32
    }

    fn raise_to(obs: &Observation, target: u32) -> PlayerAction {
        PlayerAction::Raise(target.clamp(obs.min_raise, obs.max_raise))
    }

    fn choose(obs: &Observation, strength: u8) -> PlayerAction {
        let legal = obs.legal;

        if obs.street == Street::Preflop && strength >= 8 && legal.raise {
            return Self::raise_to(obs, obs.max_raise / 2);
        }

        if obs.continue_cost == 0 {
            return match strength {
                9..=10 if legal.raise => Self::raise_to(obs, obs.my_pip + obs.pot * 2 / 3),
                7..=8 if legal.raise => Self::raise_to(obs, obs.my_pip + obs.pot / 2),
                _ => PlayerAction::Check,
            };
        }

        let cost = obs.continue_cost;
        let odds = Self::pot_odds(obs.pot, cost);
        match strength {
            9..=10 if legal.raise => Self::raise_to(obs, obs.opp_pip + obs.pot / 2),
            7..=10 => PlayerAction::Call,
            5..=6 if odds >= 0.3 || cost <= obs.pot / 4 => PlayerAction::Call,
            3..=4 if odds >= 0.4 || cost <= obs.pot / 6 => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }
}

impl Strategy for BaselineStrategy {
    fn name(&self) -> &str {
        "baseline"
    }

    fn prepare(&mut self, players: &[String]) -> Result<(), StrategyError> {
        self.opponents = players.to_vec();
        Ok(())
    }

    fn decide(&mut self, obs: &Observation) -> Result<PlayerAction, StrategyError> {
        let [c1, c2] = obs.my_cards[..] else {
            return Err(StrategyError::Decision(format!(
                "expected two hole cards, got {}",
                obs.my_cards.len()
            )));
        };
        let strength = if obs.board.is_empty() {
            Self::preflop_strength(c1, c2)
        } else {
            Self::postflop_strength(obs.deck, &obs.my_cards, &obs.board)
        };
        Ok(Self::choose(obs, strength))
    }

    fn round_over(&mut self, summary: &RoundSummary) -> Vec<String> {
        let mut lines = vec![format!(
            "round {}: delta {:+}, bankroll {}",
            summary.round, summary.delta, summary.bankroll
        )];
        if summary.is_match_over {
            lines.push(format!(
                "match over after {} rounds at table [{}]",
                summary.round,
                self.opponents.join(", ")
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerbot_engine::cards::parse_cards;
    use pokerbot_engine::rules::{replay, Progress, TableRules};

    fn two(tokens: [&str; 2]) -> (Card, Card) {
        let cards = parse_cards(&tokens).expect("cards");
        (cards[0], cards[1])
    }

    fn observe(tokens: &[&str], board: &[&str], history: &[PlayerAction]) -> Observation {
        let state = match replay(TableRules::default(), history).expect("replay") {
            Progress::Betting(s) => s,
            other => panic!("{other:?}"),
        };
        Observation::from_state(
            &state,
            parse_cards(tokens).expect("hand"),
            parse_cards(board).expect("board"),
            0,
            300.0,
            1,
        )
    }

    #[test]
    fn preflop_table() {
        let (a, b) = two(["Ah", "As"]);
        assert_eq!(BaselineStrategy::preflop_strength(a, b), 10);
        let (a, b) = two(["Ah", "Kh"]);
        assert_eq!(BaselineStrategy::preflop_strength(a, b), 10);
        let (a, b) = two(["As", "Kd"]);
        assert_eq!(BaselineStrategy::preflop_strength(a, b), 8);
        let (a, b) = two(["7h", "2s"]);
        assert!(BaselineStrategy::preflop_strength(a, b) <= 3);
        let (a, b) = two(["9h", "8h"]);
        assert!((4..=6).contains(&BaselineStrategy::preflop_strength(a, b)));
    }

    #[test]
    fn ace_king_opens_to_half_the_max() {
        let obs = observe(&["As", "Kd"], &[], &[]);
        let mut bot = BaselineStrategy::new();
        assert_eq!(bot.decide(&obs), Ok(PlayerAction::Raise(200)));
    }

    #[test]
    fn trash_folds_to_a_big_raise() {
        let obs = observe(&["7h", "2s"], &[], &[PlayerAction::Raise(300)]);
        let mut bot = BaselineStrategy::new();
        assert_eq!(bot.decide(&obs), Ok(PlayerAction::Fold));
    }

    #[test]
    fn weak_hand_checks_when_free() {
        let obs = observe(
            &["7h", "2s"],
            &["Kc", "Qd", "4s"],
            &[PlayerAction::Call, PlayerAction::Check],
        );
        let mut bot = BaselineStrategy::new();
        assert_eq!(bot.decide(&obs), Ok(PlayerAction::Check));
    }

    #[test]
    fn trips_bet_for_value_within_bounds() {
        let obs = observe(
            &["Kh", "Ks"],
            &["Kc", "Qd", "4s"],
            &[PlayerAction::Call, PlayerAction::Check],
        );
        let mut bot = BaselineStrategy::new();
        match bot.decide(&obs).expect("decision") {
            PlayerAction::Raise(to) => {
                assert!(to >= obs.min_raise && to <= obs.max_raise, "raise to {to}");
            }
            other => panic!("expected a bet, got {other}"),
        }
    }

    #[test]
    fn short_deck_made_hands_follow_short_deck_order() {
        let hole = parse_cards(&["Ah", "7h"]).expect("hole");
        let wheel = parse_cards(&["6c", "8d", "9s"]).expect("board");
        assert_eq!(
            BaselineStrategy::postflop_strength(DeckVariant::Short, &hole, &wheel),
            7
        );
        assert_eq!(
            BaselineStrategy::postflop_strength(DeckVariant::Standard, &hole, &wheel),
            2
        );

        let flush = parse_cards(&["9h", "Jh", "6h"]).expect("board");
        assert_eq!(
            BaselineStrategy::postflop_strength(DeckVariant::Short, &hole, &flush),
            10
        );
        assert_eq!(
            BaselineStrategy::postflop_strength(DeckVariant::Standard, &hole, &flush),
            9
        );
    }

    #[test]
    fn final_round_reports_the_table() {
        let mut bot = BaselineStrategy::new();
        bot.prepare(&["alpha".to_string(), "beta".to_string()])
            .expect("prepare");
        let summary = RoundSummary {
            round: 3,
            my_cards: vec![],
            opponent_cards: vec![],
            board: vec![],
            history: vec![PlayerAction::Fold],
            delta: -1,
            bankroll: 12,
            is_match_over: true,
        };
        let lines = bot.round_over(&summary);
        assert_eq!(lines[0], "round 3: delta -1, bankroll 12");
        assert_eq!(lines[1], "match over after 3 rounds at table [alpha, beta]");
    }

    #[test]
    fn missing_hole_cards_is_a_decision_error() {
        let mut obs = observe(&["As", "Kd"], &[], &[]);
        obs.my_cards.clear();
        let mut bot = BaselineStrategy::new();
        assert!(matches!(bot.decide(&obs), Err(StrategyError::Decision(_))));
    }
}
