use std::time::Duration;

use pokerbot_bot::{serve, BotConfig};
use pokerbot_protocol::{
    Action, ActionRequest, BotClient, ConnectOptions, EndRoundMessage, ProtocolError,
    ServerHandle,
};

const CALL: Duration = Duration::from_secs(2);

fn test_config(strategy: &str) -> BotConfig {
    BotConfig {
        host: "127.0.0.1".into(),
        port: 0,
        strategy: strategy.into(),
        ..BotConfig::default()
    }
}

async fn start(strategy: &str) -> (ServerHandle, BotClient) {
    let handle = serve(&test_config(strategy)).await.expect("serve");
    let options = ConnectOptions {
        timeout: Duration::from_millis(500),
        retries: 2,
        retry_delay: Duration::from_millis(20),
    };
    let client = BotClient::new(handle.address().to_string(), options);
    (handle, client)
}

fn tokens(cards: &[&str]) -> Vec<String> {
    cards.iter().map(|c| c.to_string()).collect()
}

fn opening_request() -> ActionRequest {
    ActionRequest {
        game_clock: 300.0,
        player_hand: tokens(&["As", "Kd"]),
        board_cards: vec![],
        new_actions: vec![],
    }
}

#[tokio::test]
async fn baseline_opens_ace_king_to_200() {
    let (handle, mut client) = start("baseline").await;
    assert!(client
        .ready_check(tokens(&["hero", "villain"]), CALL)
        .await
        .expect("ready"));

    let reply = client
        .request_action(opening_request(), CALL)
        .await
        .expect("action");
    assert_eq!(reply.action, Some(Action::raise(200)));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn restarted_bot_answers_from_history_alone() {
    let request = ActionRequest {
        game_clock: 250.0,
        player_hand: tokens(&["Qh", "Qs"]),
        board_cards: tokens(&["2c", "7d", "9h"]),
        new_actions: vec![Action::call(), Action::check(), Action::raise(4)],
    };

    let (first, mut client) = start("baseline").await;
    client
        .ready_check(tokens(&["a", "b"]), CALL)
        .await
        .expect("ready");
    client
        .request_action(
            ActionRequest {
                new_actions: vec![Action::call()],
                board_cards: vec![],
                ..request.clone()
            },
            CALL,
        )
        .await
        .expect("earlier decision");
    let before = client
        .request_action(request.clone(), CALL)
        .await
        .expect("action");
    first.shutdown().await.expect("shutdown");

    // a fresh process that never saw the ready check or earlier calls
    let (second, mut fresh) = start("baseline").await;
    let after = fresh.request_action(request, CALL).await.expect("action");
    assert_eq!(before, after);
    second.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn calls_after_match_over_are_refused() {
    let (handle, mut client) = start("check-call").await;
    client
        .ready_check(tokens(&["a", "b"]), CALL)
        .await
        .expect("ready");
    let logs = client
        .end_round(
            EndRoundMessage {
                player_hand: tokens(&["As", "Kd"]),
                new_actions: vec![Action::fold()],
                delta: 1,
                is_match_over: true,
                ..EndRoundMessage::default()
            },
            CALL,
        )
        .await
        .expect("end round");
    assert!(logs.logs.is_empty());

    let err = client
        .request_action(opening_request(), CALL)
        .await
        .expect_err("refused");
    match err {
        ProtocolError::Remote(message) => assert!(message.contains("match is over")),
        other => panic!("unexpected error {other}"),
    }
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn terminal_history_is_refused_without_dropping_the_session() {
    let (handle, mut client) = start("baseline").await;
    let err = client
        .request_action(
            ActionRequest {
                new_actions: vec![Action::fold()],
                ..opening_request()
            },
            CALL,
        )
        .await
        .expect_err("refused");
    assert!(!err.is_transport());
    assert!(client.is_connected());

    let reply = client
        .request_action(opening_request(), CALL)
        .await
        .expect("still serving");
    assert!(reply.action.is_some());
    handle.shutdown().await.expect("shutdown");
}
