use pokerbot_engine::actions::{ActionKind, PlayerAction};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::{Observation, Strategy, StrategyError};

/// Shoves whenever it can, calls otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllIn;

impl Strategy for AllIn {
    fn name(&self) -> &str {
        "all-in"
    }

    fn decide(&mut self, obs: &Observation) -> Result<PlayerAction, StrategyError> {
        Ok(if obs.legal.raise {
            PlayerAction::Raise(obs.max_raise)
        } else if obs.legal.call {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        })
    }
}

/// Never raises, never folds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckCall;

impl Strategy for CheckCall {
    fn name(&self) -> &str {
        "check-call"
    }

    fn decide(&mut self, obs: &Observation) -> Result<PlayerAction, StrategyError> {
        Ok(if obs.legal.check {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        })
    }
}

/// Uniform over legal moves; raise sizes uniform within bounds.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, obs: &Observation) -> Result<PlayerAction, StrategyError> {
        let kinds = obs.legal.kinds();
        let kind = kinds
            .choose(&mut self.rng)
            .ok_or_else(|| StrategyError::Decision("no legal actions".to_string()))?;
        Ok(match kind {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Raise => {
                PlayerAction::Raise(self.rng.random_range(obs.min_raise..=obs.max_raise))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerbot_engine::cards::parse_cards;
    use pokerbot_engine::rules::{replay, Progress, RoundState, TableRules};

    fn opening() -> Observation {
        let state = RoundState::new(TableRules::default());
        Observation::from_state(
            &state,
            parse_cards(&["7h", "2s"]).expect("cards"),
            vec![],
            0,
            300.0,
            1,
        )
    }

    #[test]
    fn all_in_raises_to_the_cap_then_calls() {
        let mut bot = AllIn;
        assert_eq!(bot.decide(&opening()), Ok(PlayerAction::Raise(400)));

        let state = match replay(TableRules::default(), &[PlayerAction::Raise(400)]).expect("replay") {
            Progress::Betting(s) => s,
            other => panic!("{other:?}"),
        };
        let facing = Observation::from_state(&state, vec![], vec![], 0, 300.0, 1);
        assert_eq!(bot.decide(&facing), Ok(PlayerAction::Call));
    }

    #[test]
    fn check_call_never_folds() {
        let mut bot = CheckCall;
        assert_eq!(bot.decide(&opening()), Ok(PlayerAction::Call));
    }

    #[test]
    fn random_choices_are_legal_and_seeded() {
        let obs = opening();
        let state = RoundState::new(TableRules::default());
        let mut a = RandomStrategy::with_seed(11);
        let mut b = RandomStrategy::with_seed(11);
        for _ in 0..50 {
            let action = a.decide(&obs).expect("decide");
            assert!(state.validate(action).is_ok(), "{action}");
            assert_eq!(Ok(action), b.decide(&obs));
        }
    }
}
