//! The current-build state store.
//!
//! [`BuildStore`] owns the single current [`BuildSnapshot`] and is the only
//! writer to it. The snapshot lives in a `tokio::sync::watch` channel: each
//! operation commits one complete snapshot, so subscribers never observe a
//! half-applied change.

use std::collections::HashSet;
use std::future::Future;

use tokio::sync::watch;

use crate::errors::{AppError, BuildError, LoadFailureReason};
use crate::models::{BuildSnapshot, Category, Component, ResolvedBuild};

/// Something that can resolve a saved build into full components.
pub trait BuildSource {
    /// `Ok(None)` when no build has this id.
    fn resolve_build(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<ResolvedBuild>, AppError>> + Send;
}

/// Owner of the current build.
pub struct BuildStore {
    state: watch::Sender<BuildSnapshot>,
}

impl Default for BuildStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildStore {
    /// Create a store holding the empty build.
    pub fn new() -> Self {
        let (state, _) = watch::channel(BuildSnapshot::default());
        Self { state }
    }

    /// A copy of the current build.
    pub fn snapshot(&self) -> BuildSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every committed snapshot from now on.
    pub fn subscribe(&self) -> watch::Receiver<BuildSnapshot> {
        self.state.subscribe()
    }

    /// Put a component into the build.
    ///
    /// A singular category replaces its slot. An accessory replaces any
    /// accessory with the same id and goes to the end of the list. The
    /// component's own category is not compared with `category`.
    pub fn add_component(&self, category: &str, component: Component) -> Result<(), BuildError> {
        let category = parse_category(category)?;
        tracing::debug!(
            category = %category,
            component_id = component.id,
            "Adding component to build"
        );

        self.state.send_modify(|build| {
            if category.is_singular() {
                if let Some(slot) = build.slot_mut(category) {
                    *slot = Some(component);
                }
            } else {
                build.accessories.retain(|a| a.id != component.id);
                build.accessories.push(component);
            }
        });
        Ok(())
    }

    /// Take a component out of the build.
    ///
    /// Singular categories clear their slot and ignore `id`. For accessories
    /// `id` selects the entry to drop; without it every accessory is removed.
    pub fn remove_component(&self, category: &str, id: Option<i64>) -> Result<(), BuildError> {
        let category = parse_category(category)?;
        tracing::debug!(category = %category, component_id = ?id, "Removing component from build");

        self.state.send_modify(|build| {
            if category.is_singular() {
                if let Some(slot) = build.slot_mut(category) {
                    *slot = None;
                }
            } else if let Some(id) = id {
                build.accessories.retain(|a| a.id != id);
            } else {
                build.accessories.clear();
            }
        });
        Ok(())
    }

    /// Return to the empty build.
    pub fn reset_build(&self) {
        tracing::debug!("Resetting build");
        self.state.send_replace(BuildSnapshot::default());
    }

    /// Replace the whole build in one commit.
    ///
    /// Accessories repeating an earlier id are dropped, so the committed build
    /// holds each accessory once.
    pub fn load_build(&self, mut snapshot: BuildSnapshot) {
        let mut seen = HashSet::new();
        snapshot.accessories.retain(|a| seen.insert(a.id));
        self.state.send_replace(snapshot);
    }

    /// Resolve a saved build and make it the current build.
    ///
    /// Nothing is committed until the lookup has finished. Changes made while
    /// the lookup is pending are overwritten by the loaded build; on failure
    /// the current build is left exactly as it was.
    pub async fn load_build_by_id<S>(&self, source: &S, id: i64) -> Result<(), BuildError>
    where
        S: BuildSource + ?Sized,
    {
        let resolved = match source.resolve_build(id).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                tracing::warn!(build_id = id, "Saved build not found");
                return Err(BuildError::LoadFailure {
                    build_id: id,
                    reason: LoadFailureReason::NotFound,
                });
            }
            Err(e) => {
                tracing::error!(build_id = id, "Failed to load build: {}", e);
                return Err(BuildError::LoadFailure {
                    build_id: id,
                    reason: LoadFailureReason::Repository(e.message()),
                });
            }
        };

        tracing::info!(build_id = id, name = %resolved.name, "Loaded saved build");
        self.load_build(resolved.components);
        Ok(())
    }
}

fn parse_category(category: &str) -> Result<Category, BuildError> {
    category.parse().map_err(|_| {
        tracing::warn!("Unknown component category: {}", category);
        BuildError::UnknownCategory(category.to_string())
    })
}
