//! Ticket board: tickets grouped into status columns, with optimistic
//! status changes reconciled against the server.

pub mod model;

use std::sync::Arc;

use parking_lot::Mutex;

pub use model::{BoardState, CardView, ColumnView, Dispatch, SyncState};

/// Board state shared between the view and in-flight transitions.
///
/// The lock is only ever held for synchronous updates, never across an
/// await, so the view observes optimistic writes while requests are pending.
pub type SharedBoard = Arc<Mutex<BoardState>>;

pub fn shared(board: BoardState) -> SharedBoard {
    Arc::new(Mutex::new(board))
}
