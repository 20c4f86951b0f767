//! The match loop: handshake, deal, collect actions, settle, notify.

use std::path::PathBuf;
use std::time::Instant;

use pokerbot_engine::actions::{encode_history, PlayerAction};
use pokerbot_engine::cards::{to_tokens, Card};
use pokerbot_engine::deck::{Deal, Deck};
use pokerbot_engine::hand::compare_holdings_in;
use pokerbot_engine::logger::{ActionRecord, RoundLogger, RoundRecord};
use pokerbot_engine::rules::{Progress, RoundState};
use pokerbot_protocol::{ActionRequest, ConnectOptions, EndRoundMessage};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::MatchConfig;
use crate::errors::MatchError;
use crate::seat::Seat;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub bankroll: i64,
    pub violations: u32,
    pub clock_remaining: f64,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub seed: u64,
    pub rounds_played: u32,
    pub players: Vec<PlayerSummary>,
    pub round_log: PathBuf,
}

/// Everything the acting seat is told about the round.
struct Turn<'a> {
    round: u32,
    seat: usize,
    state: &'a RoundState,
    hand: &'a [Card],
    board: &'a [Card],
    history: &'a [PlayerAction],
}

struct RoundOutcome {
    /// By seat.
    deltas: [i32; 2],
    showdown: bool,
    board: Vec<Card>,
    history: Vec<PlayerAction>,
    actions: Vec<ActionRecord>,
}

/// Writes one record off the runtime threads and hands the logger back.
async fn append_record(
    mut logger: RoundLogger,
    record: RoundRecord,
) -> Result<RoundLogger, MatchError> {
    let written = tokio::task::spawn_blocking(move || logger.write(&record).map(|()| logger))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(written?)
}

/// Player index sitting in each seat. Seats swap every round.
pub fn seat_order(round: u32) -> [usize; 2] {
    if round % 2 == 1 {
        [0, 1]
    } else {
        [1, 0]
    }
}

pub struct MatchRunner {
    config: MatchConfig,
    match_id: String,
    seed: u64,
    // indexed by player, not seat
    seats: [Seat; 2],
    deck: Deck,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let match_id = config
            .match_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let options = ConnectOptions {
            timeout: config.connect_timeout(),
            retries: config.connect_retries,
            retry_delay: config.connect_timeout(),
        };
        let seats = [0, 1].map(|i| {
            let player = &config.players[i];
            Seat::new(
                player.name.clone(),
                player.address.clone(),
                options,
                config.starting_game_clock,
                config.player_log_size_limit,
            )
        });
        Ok(Self {
            match_id,
            seed,
            seats,
            deck: Deck::with_variant(config.rules.deck, seed),
            config,
        })
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Plays the match to completion.
    ///
    /// # Errors
    ///
    /// [`MatchError::HandshakeFailed`] when any bot is unreachable or not
    /// ready; no card is dealt in that case. Bot misbehaviour during play is
    /// never an error: it is substituted, logged and recorded.
    pub async fn run(mut self) -> Result<MatchSummary, MatchError> {
        let rounds = self.config.rounds;
        info!(
            match_id = %self.match_id,
            seed = self.seed,
            rounds,
            players = ?self.config.player_names(),
            "starting match"
        );
        self.handshake().await?;

        tokio::fs::create_dir_all(&self.config.log_dir).await?;
        let round_log = self
            .config
            .log_dir
            .join(format!("match_{}.jsonl", self.match_id));
        let mut logger = RoundLogger::create(&round_log)?;

        let mut rounds_played = 0;
        for round in 1..=rounds {
            let order = seat_order(round);
            let deal = Deal::from_deck(&mut self.deck)?;
            let outcome = self.play_round(round, order, &deal).await?;
            rounds_played = round;

            for (seat, &player) in order.iter().enumerate() {
                self.seats[player].bankroll += i64::from(outcome.deltas[seat]);
            }
            let out_of_time = self.seats.iter().all(Seat::out_of_time);
            let match_over = round == rounds || out_of_time;

            self.end_round(round, order, &deal, &outcome, match_over)
                .await;
            let record = RoundRecord {
                match_id: self.match_id.clone(),
                round,
                seats: order.map(|p| self.seats[p].name.clone()),
                hands: deal.hands.clone(),
                board: outcome.board,
                actions: outcome.actions,
                deltas: outcome.deltas,
                showdown: outcome.showdown,
                ts: None,
            };
            logger = append_record(logger, record).await?;

            if round % 50 == 0 {
                for seat in &self.seats {
                    info!(
                        round,
                        player = %seat.name,
                        bankroll = seat.bankroll,
                        clock = seat.clock,
                        "progress"
                    );
                }
            }
            if match_over {
                if round < rounds {
                    warn!(round, "every game clock has run out; ending match early");
                }
                break;
            }
        }

        let mut players = Vec::with_capacity(2);
        for seat in &mut self.seats {
            seat.client.close();
            let log_path = seat.log.write_to(&self.config.log_dir, &seat.name).await?;
            info!(
                player = %seat.name,
                bankroll = seat.bankroll,
                violations = seat.violations,
                "final result"
            );
            players.push(PlayerSummary {
                name: seat.name.clone(),
                bankroll: seat.bankroll,
                violations: seat.violations,
                clock_remaining: seat.clock,
                log_path,
            });
        }
        Ok(MatchSummary {
            match_id: self.match_id,
            seed: self.seed,
            rounds_played,
            players,
            round_log,
        })
    }

    /// Ready-checks both bots at once; any failure aborts.
    async fn handshake(&mut self) -> Result<(), MatchError> {
        let names = self.config.player_names();
        let timeout = self.config.ready_check_timeout();
        let [first, second] = &mut self.seats;
        let (a, b) = tokio::join!(
            first.handshake(names.clone(), timeout),
            second.handshake(names, timeout)
        );

        let mut failures = [a, b].into_iter().filter_map(Result::err);
        let Some(first_failure) = failures.next() else {
            info!("all bots ready");
            return Ok(());
        };
        error!(error = %first_failure, "aborting match");
        for failure in failures {
            error!(error = %failure, "aborting match");
        }
        for seat in &mut self.seats {
            seat.client.close();
        }
        Err(first_failure)
    }

    async fn play_round(
        &mut self,
        round: u32,
        order: [usize; 2],
        deal: &Deal,
    ) -> Result<RoundOutcome, MatchError> {
        debug!(round, seats = ?order.map(|p| self.seats[p].name.clone()), "dealing");
        let mut state = RoundState::new(self.config.rules);
        let mut history = Vec::new();
        let mut actions = Vec::new();

        loop {
            let seat = state.active();
            let street = state.street();
            let turn = Turn {
                round,
                seat,
                state: &state,
                hand: &deal.hands[seat],
                board: deal.visible_board(street.board_len()),
                history: &history,
            };
            let (played, fault) = self.decide(order[seat], &turn).await;
            actions.push(ActionRecord {
                seat,
                player: self.seats[order[seat]].name.clone(),
                street,
                action: played,
                fault,
            });
            history.push(played);

            match state.apply(played)? {
                Progress::Betting(next) => state = next,
                Progress::Folded { deltas, street, .. } => {
                    return Ok(RoundOutcome {
                        deltas,
                        showdown: false,
                        board: deal.visible_board(street.board_len()).to_vec(),
                        history,
                        actions,
                    });
                }
                Progress::Showdown(showdown) => {
                    let result = compare_holdings_in(
                        self.config.rules.deck,
                        &deal.hands[0],
                        &deal.hands[1],
                        &deal.board,
                    );
                    return Ok(RoundOutcome {
                        deltas: showdown.settle(result),
                        showdown: true,
                        board: deal.board.clone(),
                        history,
                        actions,
                    });
                }
            }
        }
    }

    /// Gets one action from `player`, substituting the default for any
    /// failure. Returns what was played and, if substituted, why.
    async fn decide(&mut self, player: usize, turn: &Turn<'_>) -> (PlayerAction, Option<String>) {
        let action_timeout = self.config.action_timeout();
        let policy = self.config.amount_policy;
        let seat = &mut self.seats[player];
        let state = turn.state;

        if seat.out_of_time() {
            debug!(round = turn.round, player = %seat.name, "out of time");
            return (state.default_action(), Some("game clock exhausted".to_string()));
        }

        let request = ActionRequest {
            game_clock: seat.clock as f32,
            player_hand: to_tokens(turn.hand),
            board_cards: to_tokens(turn.board),
            new_actions: encode_history(turn.history),
        };
        let timeout = seat.call_timeout(action_timeout);
        let started = Instant::now();
        let reply = seat.client.request_action(request, timeout).await;
        seat.clock -= started.elapsed().as_secs_f64();

        let (played, fault) = match reply.map(|r| r.action) {
            Ok(Some(wire)) => match PlayerAction::from_wire(&wire, policy) {
                Ok(action) => match state.validate(action) {
                    Ok(()) => (action, None),
                    Err(err) => {
                        let played = state.substitute(action);
                        (played, Some(format!("{err}; played {played}")))
                    }
                },
                Err(err) => {
                    let played = state.default_action();
                    (played, Some(format!("{err}; played {played}")))
                }
            },
            Ok(None) => {
                let played = state.default_action();
                (played, Some(format!("empty action; played {played}")))
            }
            Err(err) => {
                let played = state.default_action();
                (played, Some(format!("{err}; played {played}")))
            }
        };

        if let Some(reason) = &fault {
            seat.violations += 1;
            warn!(
                round = turn.round,
                seat = turn.seat,
                player = %seat.name,
                fault = %reason,
                "protocol violation"
            );
        } else {
            debug!(round = turn.round, seat = turn.seat, player = %seat.name, action = %played, "action");
        }
        (played, fault)
    }

    /// Sends each player its view of the settled round. Delivery failures
    /// are logged and otherwise ignored.
    async fn end_round(
        &mut self,
        round: u32,
        order: [usize; 2],
        deal: &Deal,
        outcome: &RoundOutcome,
        match_over: bool,
    ) {
        let timeout = self.config.end_round_timeout();
        let history = encode_history(&outcome.history);
        for player in 0..2 {
            let seat = if order[0] == player { 0 } else { 1 };
            let message = EndRoundMessage {
                player_hand: to_tokens(&deal.hands[seat]),
                opponent_hand: if outcome.showdown {
                    to_tokens(&deal.hands[1 - seat])
                } else {
                    Vec::new()
                },
                board_cards: to_tokens(&outcome.board),
                new_actions: history.clone(),
                delta: outcome.deltas[seat],
                is_match_over: match_over,
            };
            let target = &mut self.seats[player];
            match target.client.end_round(message, timeout).await {
                Ok(reply) => target.log.extend(reply.logs),
                Err(err) => {
                    warn!(round, player = %target.name, error = %err, "end of round not delivered")
                }
            }
        }
    }
}
