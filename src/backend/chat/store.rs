/**
 * Message Store
 *
 * The persistence adapter behind the chat relay. `save` is the only
 * operation the relay needs; `recent` backs the HTTP history endpoint.
 *
 * # Implementations
 *
 * - `PgMessageStore` - PostgreSQL through sqlx. Built with `None` when no
 *   database is configured, in which case every call fails with
 *   `StoreError::Unavailable` while the server keeps running.
 * - `MemoryMessageStore` - in-process, for tests and local runs. Writes can
 *   be made to fail or be held back to exercise the relay's failure and
 *   ordering behaviour.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures_util::future::BoxFuture;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::backend::chat::db;
use crate::shared::{Message, NewMessage};

/// Errors a message store can report
///
/// A failed `save` never leaves a partial record behind.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No database is configured
    #[error("Message store unavailable: no database configured")]
    Unavailable,

    /// The database driver failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store refused the write
    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Durable storage for chat messages
///
/// Returned futures own what they need, so a caller can start a write and
/// then move it onto another task.
pub trait MessageStore: Send + Sync + 'static {
    /// Persist a draft, returning it with its store-assigned id and timestamp
    fn save(&self, draft: NewMessage) -> BoxFuture<'static, Result<Message, StoreError>>;

    /// The `limit` most recent messages, oldest first
    fn recent(&self, limit: i64) -> BoxFuture<'static, Result<Vec<Message>, StoreError>>;
}

/// PostgreSQL-backed message store
#[derive(Clone)]
pub struct PgMessageStore {
    pool: Option<PgPool>,
}

impl PgMessageStore {
    /// Wrap an optional pool; `None` yields a store that always reports
    /// `Unavailable`
    pub fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }
}

impl MessageStore for PgMessageStore {
    fn save(&self, draft: NewMessage) -> BoxFuture<'static, Result<Message, StoreError>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let pool = pool.ok_or(StoreError::Unavailable)?;
            Ok(db::insert_message(&pool, &draft).await?)
        })
    }

    fn recent(&self, limit: i64) -> BoxFuture<'static, Result<Vec<Message>, StoreError>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let pool = pool.ok_or(StoreError::Unavailable)?;
            Ok(db::recent_messages(&pool, limit).await?)
        })
    }
}

/// In-memory message store
///
/// Cloning yields a handle to the same storage.
#[derive(Clone)]
pub struct MemoryMessageStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    messages: Mutex<Vec<Message>>,
    failures_pending: AtomicUsize,
    // `true` while writes may complete
    open: watch::Sender<bool>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        let (open, _) = watch::channel(true);
        Self {
            inner: Arc::new(MemoryInner {
                messages: Mutex::new(Vec::new()),
                failures_pending: AtomicUsize::new(0),
                open,
            }),
        }
    }

    /// Make the next `count` writes fail with `StoreError::Rejected`
    pub fn fail_next(&self, count: usize) {
        self.inner.failures_pending.store(count, Ordering::SeqCst);
    }

    /// Hold every write (pending and future) until [`resume`](Self::resume)
    pub fn pause(&self) {
        self.inner.open.send_replace(false);
    }

    /// Let held writes complete
    pub fn resume(&self) {
        self.inner.open.send_replace(true);
    }

    /// Snapshot of everything stored so far, in write-completion order
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        self.inner.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_failure(&self) -> bool {
        self.inner
            .failures_pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore for MemoryMessageStore {
    fn save(&self, draft: NewMessage) -> BoxFuture<'static, Result<Message, StoreError>> {
        let store = self.clone();
        Box::pin(async move {
            let mut open = store.inner.open.subscribe();
            let still_open = open.wait_for(|open| *open).await.is_ok();
            if !still_open {
                return Err(StoreError::Rejected("store closed".to_string()));
            }

            if store.take_failure() {
                return Err(StoreError::Rejected("simulated write failure".to_string()));
            }

            let message = draft.into_message(Uuid::new_v4(), Utc::now());
            store.lock().push(message.clone());
            Ok(message)
        })
    }

    fn recent(&self, limit: i64) -> BoxFuture<'static, Result<Vec<Message>, StoreError>> {
        let store = self.clone();
        Box::pin(async move {
            let messages = store.lock();
            let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
            let start = messages.len().saturating_sub(limit);
            Ok(messages[start..].to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_save_assigns_identity() {
        let store = MemoryMessageStore::new();
        let first = store.save(NewMessage::new("alice", "hi", None)).await.unwrap();
        let second = store.save(NewMessage::new("alice", "hi", None)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.messages(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_memory_fail_next_leaves_no_record() {
        let store = MemoryMessageStore::new();
        store.fail_next(1);

        let result = store.save(NewMessage::new("alice", "lost", None)).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(store.is_empty());

        store.save(NewMessage::new("alice", "kept", None)).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_pause_holds_writes() {
        let store = MemoryMessageStore::new();
        store.pause();

        let handle = {
            let store = store.clone();
            tokio::spawn(async move { store.save(NewMessage::new("a", "b", None)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.is_empty());
        assert!(!handle.is_finished());

        store.resume();
        handle.await.unwrap().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_paused_save_is_woken_by_resume() {
        let store = MemoryMessageStore::new();
        store.pause();

        let mut save = tokio_test::task::spawn(store.save(NewMessage::new("a", "b", None)));
        tokio_test::assert_pending!(save.poll());

        store.resume();
        assert!(save.is_woken());
        let saved = tokio_test::assert_ready!(save.poll());
        assert_eq!(saved.unwrap().message, "b");
    }

    #[tokio::test]
    async fn test_memory_recent_returns_tail_oldest_first() {
        let store = MemoryMessageStore::new();
        for i in 0..5 {
            store.save(NewMessage::new("a", format!("m{}", i), None)).await.unwrap();
        }

        let recent = store.recent(2).await.unwrap();
        let bodies: Vec<_> = recent.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(bodies, vec!["m3", "m4"]);

        assert_eq!(store.recent(100).await.unwrap().len(), 5);
        assert!(store.recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pg_store_without_pool_is_unavailable() {
        let store = PgMessageStore::new(None);
        let result = store.save(NewMessage::new("alice", "hi", None)).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
        assert!(matches!(store.recent(10).await, Err(StoreError::Unavailable)));
    }
}
