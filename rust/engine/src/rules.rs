//! Heads-up no-limit betting state.
//!
//! A round is a value: every applied action produces a fresh [`RoundState`]
//! (or a terminal [`Progress`]), so the match engine and the bots can both
//! rebuild the same state from the same history.
//!
//! Seat 0 posts the small blind and acts first preflop; seat 1 acts first on
//! every later street.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::actions::{LegalActions, PlayerAction};
use crate::cards::DeckVariant;
use crate::errors::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Which deck the dealer uses; also decides showdown ordering.
    pub deck: DeckVariant,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            starting_stack: 400,
            small_blind: 1,
            big_blind: 2,
            deck: DeckVariant::Short,
        }
    }
}

impl TableRules {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 {
            return Err(GameError::InvalidRules(
                "small_blind must be positive".to_string(),
            ));
        }
        if self.big_blind < self.small_blind {
            return Err(GameError::InvalidRules(format!(
                "big_blind {} is below small_blind {}",
                self.big_blind, self.small_blind
            )));
        }
        if self.starting_stack < self.big_blind {
            return Err(GameError::InvalidRules(format!(
                "starting_stack {} cannot cover big_blind {}",
                self.starting_stack, self.big_blind
            )));
        }
        if i32::try_from(self.starting_stack).is_err() {
            return Err(GameError::InvalidRules(
                "starting_stack does not fit a signed 32-bit delta".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Board cards visible on this street.
    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    pub fn from_board_len(len: usize) -> Option<Street> {
        match len {
            0 => Some(Street::Preflop),
            3 => Some(Street::Flop),
            4 => Some(Street::Turn),
            5 => Some(Street::River),
            _ => None,
        }
    }
}

/// Betting state of a round in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    rules: TableRules,
    // counts turns within the street; the acting seat is `button % 2`
    button: u32,
    street: Street,
    pips: [u32; 2],
    stacks: [u32; 2],
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Betting(RoundState),
    Folded {
        folder: usize,
        street: Street,
        deltas: [i32; 2],
    },
    Showdown(Showdown),
}

impl Progress {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Progress::Betting(_))
    }
}

/// Betting has closed on the river; deltas depend on who holds the better hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Showdown {
    pub starting_stack: u32,
    pub stacks: [u32; 2],
}

impl Showdown {
    /// Deltas per seat given how seat 0's hand compares to seat 1's.
    pub fn settle(&self, seat0_vs_seat1: Ordering) -> [i32; 2] {
        let start = self.starting_stack as i32;
        let [s0, s1] = [self.stacks[0] as i32, self.stacks[1] as i32];
        let d0 = match seat0_vs_seat1 {
            Ordering::Greater => start - s1,
            Ordering::Less => s0 - start,
            Ordering::Equal => (s0 - s1) / 2,
        };
        [d0, -d0]
    }

    pub fn pot(&self) -> u32 {
        (2 * self.starting_stack).saturating_sub(self.stacks[0] + self.stacks[1])
    }
}

impl RoundState {
    /// Posts the blinds and hands the first decision to seat 0.
    pub fn new(rules: TableRules) -> Self {
        let stack = rules.starting_stack;
        Self {
            rules,
            button: 0,
            street: Street::Preflop,
            pips: [rules.small_blind, rules.big_blind],
            stacks: [
                stack.saturating_sub(rules.small_blind),
                stack.saturating_sub(rules.big_blind),
            ],
        }
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn active(&self) -> usize {
        (self.button % 2) as usize
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn pips(&self) -> [u32; 2] {
        self.pips
    }

    pub fn stacks(&self) -> [u32; 2] {
        self.stacks
    }

    pub fn pot(&self) -> u32 {
        (2 * self.rules.starting_stack).saturating_sub(self.stacks[0] + self.stacks[1])
    }

    /// Chips the acting seat must add to match the opponent.
    pub fn continue_cost(&self) -> u32 {
        let a = self.active();
        self.pips[1 - a].saturating_sub(self.pips[a])
    }

    pub fn legal_actions(&self) -> LegalActions {
        let a = self.active();
        let cost = self.continue_cost();
        if cost == 0 {
            let capped = self.stacks[0] == 0 || self.stacks[1] == 0;
            return LegalActions {
                check: true,
                raise: !capped,
                ..LegalActions::default()
            };
        }
        let capped = cost >= self.stacks[a] || self.stacks[1 - a] == 0;
        LegalActions {
            fold: true,
            call: true,
            raise: !capped,
            ..LegalActions::default()
        }
    }

    /// Inclusive "raise to" bounds for the acting seat.
    pub fn raise_bounds(&self) -> (u32, u32) {
        let a = self.active();
        let cost = self.continue_cost();
        let max_contribution = self.stacks[a].min(self.stacks[1 - a] + cost);
        let min_contribution = max_contribution.min(cost + cost.max(self.rules.big_blind));
        (
            self.pips[a] + min_contribution,
            self.pips[a] + max_contribution,
        )
    }

    /// Check when it is free, fold otherwise.
    pub fn default_action(&self) -> PlayerAction {
        if self.legal_actions().check {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        }
    }

    /// Strict legality check against this state.
    ///
    /// # Errors
    ///
    /// - [`GameError::IllegalAction`] when the action kind is not open
    /// - [`GameError::RaiseOutOfBounds`] for a raise outside [`Self::raise_bounds`]
    pub fn validate(&self, action: PlayerAction) -> Result<(), GameError> {
        if !self.legal_actions().contains(action.kind()) {
            return Err(GameError::IllegalAction(action));
        }
        if let PlayerAction::Raise(amount) = action {
            let (min, max) = self.raise_bounds();
            if amount < min || amount > max {
                return Err(GameError::RaiseOutOfBounds { amount, min, max });
            }
        }
        Ok(())
    }

    /// The action that will actually be played for `action`: itself when
    /// legal, a call for an oversized or undersized raise that at least
    /// covers the cost, otherwise the default action.
    pub fn substitute(&self, action: PlayerAction) -> PlayerAction {
        if self.validate(action).is_ok() {
            return action;
        }
        let legal = self.legal_actions();
        match action {
            PlayerAction::Raise(amount) if amount >= self.continue_cost() && legal.call => {
                PlayerAction::Call
            }
            _ => self.default_action(),
        }
    }

    /// Applies a legal action.
    ///
    /// # Errors
    ///
    /// Whatever [`Self::validate`] reports; the state is left untouched.
    pub fn apply(&self, action: PlayerAction) -> Result<Progress, GameError> {
        self.validate(action)?;
        let a = self.active();
        let progress = match action {
            PlayerAction::Fold => {
                let start = self.rules.starting_stack as i32;
                let d0 = if a == 0 {
                    self.stacks[0] as i32 - start
                } else {
                    start - self.stacks[1] as i32
                };
                Progress::Folded {
                    folder: a,
                    street: self.street,
                    deltas: [d0, -d0],
                }
            }
            PlayerAction::Call => {
                if self.street == Street::Preflop && self.button == 0 {
                    // small blind completes; big blind keeps the option
                    let bb = self.rules.big_blind;
                    let stack = self.rules.starting_stack.saturating_sub(bb);
                    Progress::Betting(RoundState {
                        button: 1,
                        pips: [bb, bb],
                        stacks: [stack, stack],
                        ..self.clone()
                    })
                } else {
                    let cost = self.continue_cost();
                    let mut next = self.clone();
                    next.pips[a] += cost;
                    next.stacks[a] -= cost;
                    next.proceed_street()
                }
            }
            PlayerAction::Check => {
                let closes = (self.street == Street::Preflop && self.button > 0) || self.button > 1;
                if closes {
                    self.clone().proceed_street()
                } else {
                    Progress::Betting(RoundState {
                        button: self.button + 1,
                        ..self.clone()
                    })
                }
            }
            PlayerAction::Raise(to) => {
                let contribution = to - self.pips[a];
                let mut next = self.clone();
                next.pips[a] = to;
                next.stacks[a] -= contribution;
                next.button += 1;
                Progress::Betting(next)
            }
        };
        Ok(progress)
    }

    fn proceed_street(self) -> Progress {
        match self.street.next() {
            Some(street) => Progress::Betting(RoundState {
                button: 1,
                street,
                pips: [0, 0],
                ..self
            }),
            None => Progress::Showdown(Showdown {
                starting_stack: self.rules.starting_stack,
                stacks: self.stacks,
            }),
        }
    }
}

/// Replays a round history from the blinds.
///
/// # Errors
///
/// - [`GameError::RoundAlreadyComplete`] when an action follows the end of the round
/// - any validation error for an illegal action in the history
pub fn replay(rules: TableRules, history: &[PlayerAction]) -> Result<Progress, GameError> {
    let mut progress = Progress::Betting(RoundState::new(rules));
    for action in history {
        progress = match progress {
            Progress::Betting(state) => state.apply(*action)?,
            _ => return Err(GameError::RoundAlreadyComplete),
        };
    }
    Ok(progress)
}

/// Which seat a history entry belongs to, replaying as it goes.
pub fn seats_of(rules: TableRules, history: &[PlayerAction]) -> Result<Vec<usize>, GameError> {
    let mut state = RoundState::new(rules);
    let mut seats = Vec::with_capacity(history.len());
    for (i, action) in history.iter().enumerate() {
        seats.push(state.active());
        match state.apply(*action)? {
            Progress::Betting(next) => state = next,
            _ if i + 1 == history.len() => break,
            _ => return Err(GameError::RoundAlreadyComplete),
        }
    }
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    fn opening() -> RoundState {
        RoundState::new(TableRules::default())
    }

    fn betting(progress: Progress) -> RoundState {
        match progress {
            Progress::Betting(state) => state,
            other => panic!("expected betting, got {other:?}"),
        }
    }

    #[test]
    fn blinds_are_posted_and_small_blind_acts_first() {
        let s = opening();
        assert_eq!(s.active(), 0);
        assert_eq!(s.pips(), [1, 2]);
        assert_eq!(s.stacks(), [399, 398]);
        assert_eq!(s.continue_cost(), 1);
        assert_eq!(s.pot(), 3);
        let legal = s.legal_actions();
        assert!(legal.fold && legal.call && legal.raise && !legal.check);
    }

    #[test]
    fn opening_raise_bounds() {
        assert_eq!(opening().raise_bounds(), (4, 400));
        assert!(opening().validate(PlayerAction::Raise(200)).is_ok());
        assert_eq!(
            opening().validate(PlayerAction::Raise(3)),
            Err(GameError::RaiseOutOfBounds {
                amount: 3,
                min: 4,
                max: 400
            })
        );
    }

    #[test]
    fn limp_gives_big_blind_the_option() {
        let s = betting(opening().apply(PlayerAction::Call).expect("call"));
        assert_eq!(s.street(), Street::Preflop);
        assert_eq!(s.active(), 1);
        assert_eq!(s.pips(), [2, 2]);
        assert_eq!(s.stacks(), [398, 398]);
        assert!(s.legal_actions().check);

        let flop = betting(s.apply(PlayerAction::Check).expect("check"));
        assert_eq!(flop.street(), Street::Flop);
        assert_eq!(flop.active(), 1);
        assert_eq!(flop.pips(), [0, 0]);
    }

    #[test]
    fn two_checks_close_a_postflop_street() {
        let mut s = betting(opening().apply(PlayerAction::Call).expect("call"));
        s = betting(s.apply(PlayerAction::Check).expect("bb checks"));
        s = betting(s.apply(PlayerAction::Check).expect("first check"));
        assert_eq!(s.street(), Street::Flop);
        assert_eq!(s.active(), 0);
        s = betting(s.apply(PlayerAction::Check).expect("second check"));
        assert_eq!(s.street(), Street::Turn);
    }

    #[test]
    fn fold_settles_committed_chips() {
        match opening().apply(PlayerAction::Fold).expect("fold") {
            Progress::Folded { folder, deltas, street } => {
                assert_eq!(folder, 0);
                assert_eq!(street, Street::Preflop);
                assert_eq!(deltas, [-1, 1]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let raised = betting(opening().apply(PlayerAction::Raise(6)).expect("raise"));
        match raised.apply(PlayerAction::Fold).expect("fold") {
            Progress::Folded { folder, deltas, .. } => {
                assert_eq!(folder, 1);
                assert_eq!(deltas, [2, -2]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn all_in_and_call_runs_out_to_showdown() {
        let shove = betting(opening().apply(PlayerAction::Raise(400)).expect("shove"));
        assert_eq!(shove.stacks(), [0, 398]);
        let legal = shove.legal_actions();
        assert!(legal.call && legal.fold && !legal.raise);

        let mut progress = shove.apply(PlayerAction::Call).expect("call");
        let mut checks = 0;
        while let Progress::Betting(state) = progress {
            assert_eq!(state.legal_actions().kinds(), vec![ActionKind::Check]);
            progress = state.apply(PlayerAction::Check).expect("check");
            checks += 1;
        }
        assert_eq!(checks, 6);
        match progress {
            Progress::Showdown(showdown) => {
                assert_eq!(showdown.pot(), 800);
                assert_eq!(showdown.settle(Ordering::Greater), [400, -400]);
                assert_eq!(showdown.settle(Ordering::Less), [-400, 400]);
                assert_eq!(showdown.settle(Ordering::Equal), [0, 0]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn substitution_prefers_call_then_check_then_fold() {
        let s = opening();
        assert_eq!(s.substitute(PlayerAction::Raise(1000)), PlayerAction::Call);
        assert_eq!(s.substitute(PlayerAction::Check), PlayerAction::Fold);
        assert_eq!(s.substitute(PlayerAction::Raise(200)), PlayerAction::Raise(200));

        let option = betting(s.apply(PlayerAction::Call).expect("call"));
        assert_eq!(option.substitute(PlayerAction::Call), PlayerAction::Check);
        assert_eq!(option.substitute(PlayerAction::Fold), PlayerAction::Check);
    }

    #[test]
    fn replay_refuses_actions_after_the_round_ends() {
        let history = [PlayerAction::Fold, PlayerAction::Check];
        assert_eq!(
            replay(TableRules::default(), &history),
            Err(GameError::RoundAlreadyComplete)
        );
        let progress = replay(TableRules::default(), &[PlayerAction::Fold]).expect("replay");
        assert!(progress.is_terminal());
    }

    #[test]
    fn seats_follow_the_turn_order() {
        let history = [
            PlayerAction::Call,
            PlayerAction::Check,
            PlayerAction::Check,
            PlayerAction::Raise(10),
            PlayerAction::Fold,
        ];
        let seats = seats_of(TableRules::default(), &history).expect("seats");
        assert_eq!(seats, vec![0, 1, 1, 0, 1]);
    }

    #[test]
    fn rules_validation() {
        assert!(TableRules::default().validate().is_ok());
        let bad = TableRules {
            small_blind: 5,
            big_blind: 2,
            ..TableRules::default()
        };
        assert!(matches!(bad.validate(), Err(GameError::InvalidRules(_))));
    }
}
