use crate::errors::ServiceError;
use crate::messages::{
    bot_request, bot_response, ActionRequest, ActionResponse, BotRequest, BotResponse, CallError,
    EndRoundMessage, EndRoundResponse, ReadyCheckRequest, ReadyCheckResponse,
};

/// The three calls a bot endpoint answers.
///
/// Calls arrive one at a time; an implementation never sees two in flight.
/// Every request is a complete snapshot, so an implementation must be able to
/// answer correctly even if it lost all state since the previous call.
pub trait BotService: Send + 'static {
    fn ready_check(
        &mut self,
        request: ReadyCheckRequest,
    ) -> Result<ReadyCheckResponse, ServiceError>;

    fn request_action(&mut self, request: ActionRequest) -> Result<ActionResponse, ServiceError>;

    fn end_round(&mut self, request: EndRoundMessage) -> Result<EndRoundResponse, ServiceError>;
}

/// Routes one envelope to the matching call and wraps the outcome.
pub fn dispatch<S: BotService + ?Sized>(service: &mut S, request: BotRequest) -> BotResponse {
    let call_id = request.call_id;
    let reply = match request.call {
        Some(bot_request::Call::ReadyCheck(req)) => service
            .ready_check(req)
            .map(bot_response::Reply::ReadyCheck),
        Some(bot_request::Call::RequestAction(req)) => service
            .request_action(req)
            .map(bot_response::Reply::Action),
        Some(bot_request::Call::EndRound(req)) => {
            service.end_round(req).map(bot_response::Reply::EndRound)
        }
        None => Err(ServiceError::InvalidRequest("empty call".into())),
    };
    let reply = reply.unwrap_or_else(|err| {
        tracing::warn!(call_id, error = %err, "refusing call");
        bot_response::Reply::Error(CallError {
            message: err.to_string(),
        })
    });
    BotResponse {
        call_id,
        reply: Some(reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Action;

    struct Refusing;

    impl BotService for Refusing {
        fn ready_check(
            &mut self,
            _request: ReadyCheckRequest,
        ) -> Result<ReadyCheckResponse, ServiceError> {
            Ok(ReadyCheckResponse { ready: true })
        }

        fn request_action(
            &mut self,
            _request: ActionRequest,
        ) -> Result<ActionResponse, ServiceError> {
            Ok(ActionResponse::new(Action::check()))
        }

        fn end_round(
            &mut self,
            _request: EndRoundMessage,
        ) -> Result<EndRoundResponse, ServiceError> {
            Err(ServiceError::MatchEnded)
        }
    }

    #[test]
    fn dispatch_echoes_call_id_and_routes() {
        let response = dispatch(
            &mut Refusing,
            BotRequest {
                call_id: 42,
                call: Some(bot_request::Call::ReadyCheck(ReadyCheckRequest::default())),
            },
        );
        assert_eq!(response.call_id, 42);
        assert_eq!(
            response.reply,
            Some(bot_response::Reply::ReadyCheck(ReadyCheckResponse {
                ready: true
            }))
        );
    }

    #[test]
    fn service_errors_become_call_errors() {
        let response = dispatch(
            &mut Refusing,
            BotRequest {
                call_id: 1,
                call: Some(bot_request::Call::EndRound(EndRoundMessage::default())),
            },
        );
        match response.reply {
            Some(bot_response::Reply::Error(err)) => assert!(err.message.contains("match is over")),
            other => panic!("expected error reply, got {:?}", other),
        }
    }

    #[test]
    fn empty_envelope_is_refused() {
        let response = dispatch(&mut Refusing, BotRequest::default());
        assert!(matches!(
            response.reply,
            Some(bot_response::Reply::Error(_))
        ));
    }
}
