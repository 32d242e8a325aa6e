//! # Notice State
//!
//! Holds the stock notice currently on screen and its auto-dismiss timer.
//!
//! ## Notice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  show(A) ──► slot = A (gen 1) ──► timer 1 sleeps display_for            │
//! │                                                                         │
//! │  show(B) ──► timer 1 aborted ──► slot = B (gen 2) ──► timer 2 sleeps    │
//! │                                                                         │
//! │  timer 2 fires ──► slot.gen == 2 ? clear : leave alone                  │
//! │                                                                         │
//! │  dismiss() ──► slot cleared, timer aborted                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one notice is active. A timer only clears the notice it was
//! started for, so a timer that wins a race with `show` never removes the
//! newer notice.

use std::sync::Arc;

use shelf_core::StockNotice;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Default)]
struct NoticeSlot {
    generation: u64,
    active: Option<ActiveNotice>,
}

#[derive(Debug)]
struct ActiveNotice {
    generation: u64,
    notice: StockNotice,
    timer: JoinHandle<()>,
}

/// Owner of the single visible stock notice.
#[derive(Debug, Clone, Default)]
pub struct NoticeState {
    slot: Arc<Mutex<NoticeSlot>>,
}

impl NoticeState {
    pub fn new() -> Self {
        NoticeState::default()
    }

    /// Shows `notice`, replacing any notice already on screen, and schedules
    /// its removal after `notice.display_for`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn show(&self, notice: StockNotice) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        let generation = slot.generation;

        if let Some(previous) = slot.active.take() {
            previous.timer.abort();
            debug!(book_id = previous.notice.book_id, "Stock notice replaced");
        }

        let timer = tokio::spawn(expire(
            Arc::clone(&self.slot),
            generation,
            notice.display_for,
        ));

        debug!(book_id = notice.book_id, generation, "Stock notice shown");
        slot.active = Some(ActiveNotice {
            generation,
            notice,
            timer,
        });
    }

    /// Clears the notice early. Returns the notice that was showing.
    pub async fn dismiss(&self) -> Option<StockNotice> {
        let active = self.slot.lock().await.active.take()?;
        active.timer.abort();
        debug!(book_id = active.notice.book_id, "Stock notice dismissed");
        Some(active.notice)
    }

    /// The notice currently on screen.
    pub async fn current(&self) -> Option<StockNotice> {
        self.slot
            .lock()
            .await
            .active
            .as_ref()
            .map(|active| active.notice.clone())
    }
}

async fn expire(slot: Arc<Mutex<NoticeSlot>>, generation: u64, after: std::time::Duration) {
    tokio::time::sleep(after).await;

    let mut slot = slot.lock().await;
    let is_current = slot
        .active
        .as_ref()
        .is_some_and(|active| active.generation == generation);

    if is_current {
        slot.active = None;
        debug!(generation, "Stock notice expired");
    }
}
