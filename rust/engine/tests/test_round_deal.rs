use std::cmp::Ordering;

use pokerbot_engine::cards::to_tokens;
use pokerbot_engine::deck::{Deal, Deck};
use pokerbot_engine::hand::compare_holdings;
use pokerbot_engine::rules::{replay, Progress, TableRules};
use pokerbot_engine::PlayerAction;

#[test]
fn all_in_round_settles_by_hand_strength() {
    let mut deck = Deck::new_with_seed(2024);
    let deal = Deal::from_deck(&mut deck).expect("deal");

    let mut history = vec![PlayerAction::Raise(400), PlayerAction::Call];
    history.extend(std::iter::repeat(PlayerAction::Check).take(6));
    let showdown = match replay(TableRules::default(), &history).expect("replay") {
        Progress::Showdown(s) => s,
        other => panic!("{other:?}"),
    };

    let order = compare_holdings(&deal.hands[0], &deal.hands[1], &deal.board);
    let deltas = showdown.settle(order);
    assert_eq!(deltas[0] + deltas[1], 0);
    match order {
        Ordering::Greater => assert_eq!(deltas[0], 400),
        Ordering::Less => assert_eq!(deltas[0], -400),
        Ordering::Equal => assert_eq!(deltas[0], 0),
    }
}

#[test]
fn dealt_tokens_are_wire_ready() {
    let mut deck = Deck::new_with_seed(5);
    let deal = Deal::from_deck(&mut deck).expect("deal");
    for token in to_tokens(&deal.board) {
        assert_eq!(token.len(), 2);
    }
    assert_eq!(to_tokens(&deal.hands[0]).len(), 2);
}
