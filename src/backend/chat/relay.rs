/**
 * Chat Relay
 *
 * Receives `chat message` events from connected clients, persists them, and
 * rebroadcasts the persisted record to every connected client, the sender
 * included.
 *
 * # Guarantees
 *
 * - A message is broadcast only after the store confirmed the write, and the
 *   broadcast carries the stored record (id and timestamp included).
 * - A failed write is logged and dropped: nobody, not even the sender, hears
 *   about it, and the sender's connection stays open.
 * - Frames that cannot be decoded or fail validation never reach the store;
 *   the sender alone gets a `chat rejected` event explaining why.
 * - There is no history replay: a client only sees messages whose write
 *   completed while it was connected.
 *
 * # Ordering
 *
 * `receive` is awaited by the connection's reader loop, one frame at a time.
 * It starts each write there by polling the store future once, so a store
 * sees one connection's drafts in receipt order. A write that does not
 * finish on that first poll moves to its own task. Broadcasts therefore
 * follow write completion, which for concurrent senders (or a slow write
 * followed by a fast one) need not match receipt order. A hung write only
 * delays its own broadcast.
 */

use std::future::{poll_fn, Future};
use std::sync::Arc;
use std::task::Poll;

use tokio::task::JoinHandle;

use crate::backend::chat::store::{MessageStore, StoreError};
use crate::backend::realtime::broadcast::{BroadcastGroup, ClientSender, ConnectionId};
use crate::shared::{ClientEvent, Message, NewMessage, ServerEvent, SharedError};

/// What became of one accepted chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Persisted and handed to `recipients` connected clients
    Broadcast {
        /// The persisted record that was sent
        message: Message,
        /// Members present when the broadcast happened
        recipients: usize,
    },
    /// The write failed; nothing was broadcast
    Dropped,
}

/// The chat relay: one broadcast group plus the store it writes through
#[derive(Clone)]
pub struct ChatRelay {
    group: BroadcastGroup,
    store: Arc<dyn MessageStore>,
}

impl ChatRelay {
    /// Create a relay with an empty broadcast group
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            group: BroadcastGroup::new(),
            store,
        }
    }

    pub fn group(&self) -> &BroadcastGroup {
        &self.group
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Admit a client whose outbound events go to `sender`
    pub fn connect(&self, sender: ClientSender) -> Connection {
        let id = self.group.add(sender);
        tracing::info!("[Chat] client {} connected ({} online)", id, self.group.len());
        Connection {
            relay: self.clone(),
            state: ConnectionState::Connected(id),
        }
    }

    /// Handle one inbound text frame from connection `from`
    ///
    /// The write has been started by the time this returns. The handle
    /// resolves once the message was broadcast or dropped; `None` means the
    /// frame was rejected.
    pub async fn receive(
        &self,
        from: ConnectionId,
        frame: &str,
    ) -> Option<JoinHandle<RelayOutcome>> {
        let event = match ClientEvent::from_frame(frame) {
            Ok(event) => event,
            Err(err) => {
                self.reject(from, &err);
                return None;
            }
        };

        match event {
            ClientEvent::ChatMessage(draft) => {
                if let Err(err) = draft.validate() {
                    self.reject(from, &err);
                    return None;
                }
                Some(self.start_publish(draft).await)
            }
        }
    }

    /// Start the write for a validated draft and finish it off-task
    async fn start_publish(&self, draft: NewMessage) -> JoinHandle<RelayOutcome> {
        let mut write = self.store.save(draft);
        let first = poll_fn(|cx| Poll::Ready(write.as_mut().poll(cx))).await;

        let relay = self.clone();
        match first {
            // Broadcast here so completion order is kept for immediate writes.
            Poll::Ready(result) => {
                let outcome = relay.finish(result);
                tokio::spawn(async move { outcome })
            }
            Poll::Pending => tokio::spawn(async move {
                let result = write.await;
                relay.finish(result)
            }),
        }
    }

    /// Broadcast a stored record, or log and drop a failed write
    fn finish(&self, result: Result<Message, StoreError>) -> RelayOutcome {
        match result {
            Ok(message) => {
                let recipients = self.group.broadcast(&ServerEvent::ChatMessage(message.clone()));
                tracing::info!(
                    "[Chat] message {} from {} relayed to {} clients",
                    message.id,
                    message.username,
                    recipients
                );
                RelayOutcome::Broadcast { message, recipients }
            }
            Err(err) => {
                tracing::error!("[Chat] Message save error: {}", err);
                RelayOutcome::Dropped
            }
        }
    }

    fn reject(&self, to: ConnectionId, err: &SharedError) {
        tracing::warn!("[Chat] rejected frame from {}: {}", to, err);
        self.group.send_to(to, ServerEvent::rejected(err.to_string()));
    }
}

/// Lifecycle of one client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Member of the broadcast group
    Connected(ConnectionId),
    /// Terminal; the member has been removed
    Disconnected,
}

/// One client's membership in the relay
///
/// Dropping a `Connection` disconnects it, so membership cannot outlive the
/// task that owns the socket.
pub struct Connection {
    relay: ChatRelay,
    state: ConnectionState,
}

impl Connection {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The connection id while connected
    pub fn id(&self) -> Option<ConnectionId> {
        match self.state {
            ConnectionState::Connected(id) => Some(id),
            ConnectionState::Disconnected => None,
        }
    }

    /// Feed an inbound frame to the relay; ignored once disconnected
    pub async fn on_frame(&self, frame: &str) -> Option<JoinHandle<RelayOutcome>> {
        match self.state {
            ConnectionState::Connected(id) => self.relay.receive(id, frame).await,
            ConnectionState::Disconnected => None,
        }
    }

    /// Leave the broadcast group; calling it again is a no-op
    pub fn disconnect(&mut self) {
        if let ConnectionState::Connected(id) =
            std::mem::replace(&mut self.state, ConnectionState::Disconnected)
        {
            self.relay.group.remove(id);
            tracing::info!(
                "[Chat] client {} disconnected ({} online)",
                id,
                self.relay.group.len()
            );
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
