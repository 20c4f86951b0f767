use std::time::Duration;

use pokerbot_protocol::{
    Action, ActionRequest, ActionResponse, BotClient, BotServer, BotService, ConnectOptions,
    EndRoundMessage, EndRoundResponse, ProtocolError, ReadyCheckRequest, ReadyCheckResponse,
    ServerConfig, ServiceError,
};

/// Answers CHECK, sleeps first when the hand holds "slow" and panics when it
/// holds "panic".
#[derive(Default)]
struct EchoBot {
    rounds: u32,
}

impl BotService for EchoBot {
    fn ready_check(&mut self, request: ReadyCheckRequest) -> Result<ReadyCheckResponse, ServiceError> {
        Ok(ReadyCheckResponse {
            ready: request.player_names.len() == 2,
        })
    }

    fn request_action(&mut self, request: ActionRequest) -> Result<ActionResponse, ServiceError> {
        if request.player_hand.iter().any(|c| c == "slow") {
            std::thread::sleep(Duration::from_millis(300));
        }
        if request.player_hand.iter().any(|c| c == "panic") {
            panic!("strategy blew up");
        }
        if request.new_actions.iter().any(|a| a == &Action::fold()) {
            return Err(ServiceError::InvalidRequest("round already over".into()));
        }
        Ok(ActionResponse::new(Action::check()))
    }

    fn end_round(&mut self, request: EndRoundMessage) -> Result<EndRoundResponse, ServiceError> {
        self.rounds += 1;
        Ok(EndRoundResponse {
            logs: vec![format!("round {} delta {}", self.rounds, request.delta)],
        })
    }
}

fn fast_options() -> ConnectOptions {
    ConnectOptions {
        timeout: Duration::from_millis(500),
        retries: 2,
        retry_delay: Duration::from_millis(20),
    }
}

const CALL: Duration = Duration::from_secs(2);

#[tokio::test]
async fn full_call_sequence_over_tcp() {
    let handle = BotServer::new(ServerConfig::for_tests(), EchoBot::default())
        .start()
        .await
        .expect("start");
    let mut client = BotClient::new(handle.address().to_string(), fast_options());
    client.connect().await.expect("connect");

    let ready = client
        .ready_check(vec!["bot1".into(), "bot2".into()], CALL)
        .await
        .expect("ready check");
    assert!(ready);

    let reply = client
        .request_action(ActionRequest::default(), CALL)
        .await
        .expect("action");
    assert_eq!(reply.action, Some(Action::check()));

    let reply = client
        .end_round(
            EndRoundMessage {
                delta: -3,
                ..Default::default()
            },
            CALL,
        )
        .await
        .expect("end round");
    assert_eq!(reply.logs, vec!["round 1 delta -3".to_string()]);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn timed_out_call_drops_connection_and_next_call_recovers() {
    let handle = BotServer::new(ServerConfig::for_tests(), EchoBot::default())
        .start()
        .await
        .expect("start");
    let mut client = BotClient::new(handle.address().to_string(), fast_options());
    client.connect().await.expect("connect");

    let slow = ActionRequest {
        player_hand: vec!["slow".into()],
        ..Default::default()
    };
    let err = client
        .request_action(slow, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout(_)));
    assert!(err.is_transport());
    assert!(!client.is_connected());

    let reply = client
        .request_action(ActionRequest::default(), CALL)
        .await
        .expect("recovered call");
    assert_eq!(reply.action, Some(Action::check()));
    assert!(client.is_connected());
}

#[tokio::test]
async fn refused_call_surfaces_remote_error() {
    let handle = BotServer::new(ServerConfig::for_tests(), EchoBot::default())
        .start()
        .await
        .expect("start");
    let mut client = BotClient::new(handle.address().to_string(), fast_options());

    let request = ActionRequest {
        new_actions: vec![Action::fold()],
        ..Default::default()
    };
    let err = client.request_action(request, CALL).await.unwrap_err();
    assert!(!err.is_transport());
    match err {
        ProtocolError::Remote(message) => assert!(message.contains("round already over")),
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(client.is_connected());
}

#[tokio::test]
async fn unreachable_endpoint_fails_after_retries() {
    // bind then drop to get a port nobody listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let mut client = BotClient::new(addr.to_string(), fast_options());
    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectFailed { attempts: 2, .. }));

    let err = client
        .ready_check(vec!["bot1".into()], Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn endpoint_keeps_answering_after_a_panicked_call() {
    let handle = BotServer::new(ServerConfig::for_tests(), EchoBot::default())
        .start()
        .await
        .expect("start");
    let mut client = BotClient::new(handle.address().to_string(), fast_options());

    let exploding = ActionRequest {
        player_hand: vec!["panic".into()],
        ..Default::default()
    };
    let err = client.request_action(exploding, CALL).await.unwrap_err();
    match err {
        ProtocolError::Remote(message) => assert!(message.contains("panicked"), "{message}"),
        other => panic!("expected remote error, got {other:?}"),
    }

    let reply = client
        .request_action(ActionRequest::default(), CALL)
        .await
        .expect("action after panic");
    assert_eq!(reply.action, Some(Action::check()));
    assert!(client
        .ready_check(vec!["bot1".into(), "bot2".into()], CALL)
        .await
        .expect("ready after panic"));
    handle.shutdown().await.expect("shutdown");
}
