//! # Notice Commands

use shelf_core::StockNotice;
use tracing::debug;

use crate::state::NoticeState;

/// The stock notice currently showing, if any.
pub async fn current_notice(notices: &NoticeState) -> Option<StockNotice> {
    notices.current().await
}

/// Closes the stock notice before its timer runs out.
///
/// ## Returns
/// The notice that was closed, or `None` if nothing was showing.
pub async fn dismiss_notice(notices: &NoticeState) -> Option<StockNotice> {
    debug!("dismiss_notice command");
    notices.dismiss().await
}
