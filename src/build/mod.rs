//! The current build: state store, compatibility evaluation and summary.

mod compatibility;
mod store;
mod summary;

pub use compatibility::check_compatibility;
pub use store::{BuildSource, BuildStore};
pub use summary::BuildSummary;

use tokio::sync::watch;

use crate::models::BuildSnapshot;

/// Log every committed build until the store goes away.
pub async fn log_build_changes(mut changes: watch::Receiver<BuildSnapshot>) {
    while changes.changed().await.is_ok() {
        let snapshot = changes.borrow_and_update().clone();
        if snapshot.is_empty() {
            tracing::debug!("Current build is empty");
            continue;
        }

        let summary = BuildSummary::new(snapshot);
        tracing::debug!(
            total_price = summary.total_price,
            missing = ?summary.missing,
            warnings = summary.warnings.len(),
            "Current build changed"
        );
        for warning in &summary.warnings {
            tracing::debug!("Compatibility: {}", warning);
        }
    }
}
