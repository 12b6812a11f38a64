//! Chat relay integration tests
//!
//! Drives the relay end to end over real WebSocket connections.

#![cfg(feature = "ssr")]

mod common;

mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use pretty_assertions::assert_eq;
    use tokio::net::TcpStream;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode};
    use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    use crate::common::{memory_state, spawn_server, test_config, wait_for_members, TEST_ORIGIN};
    use postboard::shared::event::CHAT_REJECTED;
    use postboard::shared::{ClientEvent, NewMessage, ServerEvent};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    const QUIET: Duration = Duration::from_millis(300);

    async fn connect(addr: SocketAddr) -> Client {
        let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
        ws
    }

    async fn send_chat(ws: &mut Client, username: &str, message: &str) {
        let frame = ClientEvent::ChatMessage(NewMessage::new(username, message, None))
            .to_frame()
            .unwrap();
        ws.send(WsMessage::Text(frame.into())).await.unwrap();
    }

    async fn next_event(ws: &mut Client) -> ServerEvent {
        loop {
            let frame = timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for an event")
                .expect("socket closed")
                .unwrap();
            if let WsMessage::Text(text) = frame {
                return ServerEvent::from_frame(text.as_str()).unwrap();
            }
        }
    }

    async fn assert_silent(ws: &mut Client) {
        let next = timeout(QUIET, ws.next()).await;
        assert!(next.is_err(), "expected no event, got {:?}", next);
    }

    #[tokio::test]
    async fn test_both_clients_receive_the_persisted_message() {
        let (state, store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        let mut bob = connect(addr).await;
        wait_for_members(&relay, 2).await;

        send_chat(&mut alice, "alice", "hi").await;

        let to_alice = next_event(&mut alice).await;
        let to_bob = next_event(&mut bob).await;

        let stored = store.messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(to_alice, ServerEvent::ChatMessage(stored[0].clone()));
        assert_eq!(to_bob, to_alice);

        assert_silent(&mut alice).await;
        assert_silent(&mut bob).await;
    }

    #[tokio::test]
    async fn test_failed_write_is_silent_and_connection_survives() {
        let (state, store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        let mut bob = connect(addr).await;
        wait_for_members(&relay, 2).await;

        store.fail_next(1);
        send_chat(&mut alice, "alice", "lost").await;
        assert_silent(&mut alice).await;
        assert_silent(&mut bob).await;
        assert!(store.is_empty());

        send_chat(&mut alice, "alice", "second try").await;
        match next_event(&mut bob).await {
            ServerEvent::ChatMessage(message) => assert_eq!(message.message, "second try"),
            other => panic!("Expected chat message, got {:?}", other),
        }
        assert_eq!(relay.group().len(), 2);
    }

    #[tokio::test]
    async fn test_departed_client_is_removed_and_gets_nothing() {
        let (state, store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        let mut bob = connect(addr).await;
        wait_for_members(&relay, 2).await;

        bob.close(None).await.unwrap();
        wait_for_members(&relay, 1).await;

        send_chat(&mut alice, "alice", "anyone?").await;
        assert!(matches!(next_event(&mut alice).await, ServerEvent::ChatMessage(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_socket_is_stored_in_send_order() {
        let (state, store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        wait_for_members(&relay, 1).await;

        for i in 0..200 {
            send_chat(&mut alice, "alice", &i.to_string()).await;
        }
        let mut relayed = Vec::new();
        while relayed.len() < 200 {
            if let ServerEvent::ChatMessage(message) = next_event(&mut alice).await {
                relayed.push(message.message);
            }
        }

        let expected: Vec<String> = (0..200).map(|i| i.to_string()).collect();
        let stored: Vec<String> = store.messages().into_iter().map(|m| m.message).collect();
        assert_eq!(stored, expected);
        assert_eq!(relayed, expected);
    }

    #[tokio::test]
    async fn test_late_joiner_gets_no_history() {
        let (state, _store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        wait_for_members(&relay, 1).await;
        send_chat(&mut alice, "alice", "before carol").await;
        next_event(&mut alice).await;

        let mut carol = connect(addr).await;
        wait_for_members(&relay, 2).await;
        assert_silent(&mut carol).await;
    }

    #[tokio::test]
    async fn test_invalid_frame_is_rejected_to_sender_only() {
        let (state, store) = memory_state(test_config());
        let relay = state.relay.clone();
        let addr = spawn_server(state).await;

        let mut alice = connect(addr).await;
        let mut bob = connect(addr).await;
        wait_for_members(&relay, 2).await;

        send_chat(&mut alice, "", "who am I").await;
        assert_eq!(next_event(&mut alice).await.name(), CHAT_REJECTED);

        alice.send(WsMessage::Text("not json".into())).await.unwrap();
        assert_eq!(next_event(&mut alice).await.name(), CHAT_REJECTED);

        assert_silent(&mut bob).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_handshake_origin_check() {
        let (state, _store) = memory_state(test_config());
        let addr = spawn_server(state).await;
        let url = format!("ws://{}/ws", addr);

        let mut foreign = url.as_str().into_client_request().unwrap();
        foreign
            .headers_mut()
            .insert("origin", HeaderValue::from_static("https://elsewhere.example"));
        match connect_async(foreign).await {
            Err(tungstenite::Error::Http(response)) => {
                assert_eq!(response.status(), StatusCode::FORBIDDEN)
            }
            other => panic!("Expected 403, got {:?}", other.map(|(_, r)| r.status())),
        }

        let mut allowed = url.as_str().into_client_request().unwrap();
        allowed
            .headers_mut()
            .insert("origin", HeaderValue::from_static(TEST_ORIGIN));
        assert!(connect_async(allowed).await.is_ok());
    }
}
