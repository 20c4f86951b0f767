//! The bot side of a session: a [`BotService`] driving a [`Strategy`].
//!
//! Betting state is rebuilt from each request's history. The only thing
//! kept between requests of a round is a replay memo keyed by hand and
//! history prefix, so a restarted bot answers exactly like one that saw
//! every call.

use pokerbot_ai::{Observation, RoundSummary, Strategy};
use pokerbot_engine::actions::{decode_history, AmountPolicy, PlayerAction};
use pokerbot_engine::cards::{parse_cards, Card};
use pokerbot_engine::errors::GameError;
use pokerbot_engine::rules::{Progress, RoundState, TableRules};
use pokerbot_protocol::{
    ActionRequest, ActionResponse, BotService, EndRoundMessage, EndRoundResponse,
    ReadyCheckRequest, ReadyCheckResponse, ServiceError,
};
use tracing::{debug, info, warn};

/// Where a bot is in its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    /// A decision is being computed.
    AwaitingAction,
    Acted,
    RoundEnded,
    /// Terminal: every later call is refused.
    MatchEnded,
}

#[derive(Debug, Clone)]
struct ReplayMemo {
    hand: Vec<Card>,
    history: Vec<PlayerAction>,
    state: RoundState,
}

pub struct BotRunner {
    strategy: Box<dyn Strategy>,
    rules: TableRules,
    phase: Phase,
    players: Vec<String>,
    bankroll: i64,
    rounds_played: u32,
    memo: Option<ReplayMemo>,
    pending_logs: Vec<String>,
}

fn invalid(err: GameError) -> ServiceError {
    ServiceError::InvalidRequest(err.to_string())
}

impl BotRunner {
    pub fn new(strategy: Box<dyn Strategy>, rules: TableRules) -> Self {
        Self {
            strategy,
            rules,
            phase: Phase::Uninitialized,
            players: Vec::new(),
            bankroll: 0,
            rounds_played: 0,
            memo: None,
            pending_logs: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.phase == Phase::MatchEnded {
            return Err(ServiceError::MatchEnded);
        }
        Ok(())
    }

    fn note(&mut self, line: String) {
        warn!(round = self.rounds_played + 1, "{line}");
        self.pending_logs.push(line);
    }

    /// Replays `history` from the blinds, resuming from the memo when the
    /// memo is a prefix of it.
    fn rebuild(
        &mut self,
        hand: &[Card],
        history: &[PlayerAction],
    ) -> Result<RoundState, ServiceError> {
        let (mut state, done) = match &self.memo {
            Some(memo) if memo.hand == hand && history.starts_with(&memo.history) => {
                (memo.state.clone(), memo.history.len())
            }
            _ => (RoundState::new(self.rules), 0),
        };
        for action in &history[done..] {
            state = match state.apply(*action).map_err(invalid)? {
                Progress::Betting(next) => next,
                _ => {
                    return Err(ServiceError::InvalidRequest(
                        "round already over; no action to take".to_string(),
                    ))
                }
            };
        }
        self.memo = Some(ReplayMemo {
            hand: hand.to_vec(),
            history: history.to_vec(),
            state: state.clone(),
        });
        Ok(state)
    }

    fn choose(&mut self, state: &RoundState, observation: &Observation) -> PlayerAction {
        match self.strategy.decide(observation) {
            Ok(action) => match state.validate(action) {
                Ok(()) => action,
                Err(err) => {
                    let played = state.substitute(action);
                    self.note(format!(
                        "strategy chose {action} ({err}); playing {played}"
                    ));
                    played
                }
            },
            Err(err) => {
                let played = state.default_action();
                self.note(format!("strategy failed: {err}; playing {played}"));
                played
            }
        }
    }
}

impl BotService for BotRunner {
    fn ready_check(
        &mut self,
        request: ReadyCheckRequest,
    ) -> Result<ReadyCheckResponse, ServiceError> {
        self.ensure_open()?;
        if self.phase != Phase::Uninitialized {
            warn!(phase = ?self.phase, "repeated ready check");
        }
        match self.strategy.prepare(&request.player_names) {
            Ok(()) => {
                info!(
                    strategy = self.strategy.name(),
                    players = ?request.player_names,
                    "ready"
                );
                self.players = request.player_names;
                self.phase = Phase::Ready;
                Ok(ReadyCheckResponse { ready: true })
            }
            Err(err) => {
                self.note(format!("initialization failed: {err}"));
                Ok(ReadyCheckResponse { ready: false })
            }
        }
    }

    fn request_action(&mut self, request: ActionRequest) -> Result<ActionResponse, ServiceError> {
        self.ensure_open()?;
        if self.phase == Phase::Uninitialized {
            warn!("action requested before ready check; serving from history");
        }
        let hand = parse_cards(&request.player_hand).map_err(invalid)?;
        let board = parse_cards(&request.board_cards).map_err(invalid)?;
        let history = decode_history(&request.new_actions, AmountPolicy::Ignore).map_err(invalid)?;

        let state = self.rebuild(&hand, &history)?;
        if state.street().board_len() != board.len() {
            return Err(ServiceError::InvalidRequest(format!(
                "{} board cards on {:?}",
                board.len(),
                state.street()
            )));
        }

        self.phase = Phase::AwaitingAction;
        let observation = Observation::from_state(
            &state,
            hand,
            board,
            self.bankroll,
            request.game_clock,
            self.rounds_played + 1,
        );
        let action = self.choose(&state, &observation);
        self.phase = Phase::Acted;
        debug!(
            round = observation.round,
            street = ?observation.street,
            %action,
            "acted"
        );
        Ok(ActionResponse::new(action.to_wire()))
    }

    fn end_round(&mut self, request: EndRoundMessage) -> Result<EndRoundResponse, ServiceError> {
        self.ensure_open()?;
        let my_cards = parse_cards(&request.player_hand).map_err(invalid)?;
        let opponent_cards = parse_cards(&request.opponent_hand).map_err(invalid)?;
        let board = parse_cards(&request.board_cards).map_err(invalid)?;
        let history = decode_history(&request.new_actions, AmountPolicy::Ignore).map_err(invalid)?;
        if self.phase == Phase::Uninitialized {
            warn!("round ended before ready check");
        }

        self.bankroll += i64::from(request.delta);
        self.rounds_played += 1;
        self.memo = None;
        let summary = RoundSummary {
            round: self.rounds_played,
            my_cards,
            opponent_cards,
            board,
            history,
            delta: request.delta,
            bankroll: self.bankroll,
            is_match_over: request.is_match_over,
        };
        let mut logs = std::mem::take(&mut self.pending_logs);
        logs.extend(self.strategy.round_over(&summary));

        self.phase = if request.is_match_over {
            Phase::MatchEnded
        } else {
            Phase::RoundEnded
        };
        info!(
            round = self.rounds_played,
            delta = request.delta,
            bankroll = self.bankroll,
            match_over = request.is_match_over,
            "round over"
        );
        Ok(EndRoundResponse { logs })
    }
}
