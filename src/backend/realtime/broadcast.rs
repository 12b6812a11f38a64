/**
 * Broadcast Group
 *
 * The set of currently connected relay clients. It starts empty when the
 * process starts, gains a member per accepted connection, loses it on
 * disconnect, and lives as long as the process.
 *
 * # Delivery
 *
 * Each member is represented by the sending half of an unbounded channel
 * that its connection task drains into the socket. A broadcast walks the
 * member map while holding the lock, so the recipients of one event are
 * exactly the members present at that instant: a client that joins after
 * the walk sees nothing of the event, and one that left before it sees
 * nothing either.
 *
 * Sends never block, so the lock is only held for the walk itself.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Identifies one accepted connection for its whole lifetime
pub type ConnectionId = Uuid;

/// Channel into a connection's outbound writer
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// The process-wide set of relay members
///
/// Cloning yields another handle to the same set.
#[derive(Clone, Default)]
pub struct BroadcastGroup {
    members: Arc<Mutex<HashMap<ConnectionId, ClientSender>>>,
}

impl BroadcastGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new member and return its id
    pub fn add(&self, sender: ClientSender) -> ConnectionId {
        let id = Uuid::new_v4();
        self.lock().insert(id, sender);
        id
    }

    /// Remove a member; returns `false` if it was not present
    pub fn remove(&self, id: ConnectionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Send an event to every current member
    ///
    /// Returns the number of members the event was handed to. A member whose
    /// writer has already gone away is skipped; its connection task removes
    /// it on the way out.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let members = self.lock();
        let delivered = members
            .values()
            .filter(|sender| sender.send(event.clone()).is_ok())
            .count();
        tracing::debug!(
            "[Realtime] {} broadcast to {}/{} members",
            event.name(),
            delivered,
            members.len()
        );
        delivered
    }

    /// Send an event to one member only
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        match self.lock().get(&id) {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConnectionId, ClientSender>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
