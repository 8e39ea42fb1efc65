//! Build models: the in-memory snapshot and the persisted saved build.

use serde::{Deserialize, Serialize};

use super::{Category, Component};

/// The complete state of the current build at one instant.
///
/// One optional component per singular category plus the accessories in
/// insertion order, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSnapshot {
    #[serde(default)]
    pub drone: Option<Component>,
    #[serde(default)]
    pub goggles: Option<Component>,
    #[serde(default)]
    pub radio: Option<Component>,
    #[serde(default)]
    pub battery: Option<Component>,
    #[serde(default)]
    pub accessories: Vec<Component>,
}

impl BuildSnapshot {
    /// The component occupying a singular slot. Always `None` for accessories.
    pub fn slot(&self, category: Category) -> Option<&Component> {
        match category {
            Category::Drone => self.drone.as_ref(),
            Category::Goggles => self.goggles.as_ref(),
            Category::Radio => self.radio.as_ref(),
            Category::Battery => self.battery.as_ref(),
            Category::Accessory => None,
        }
    }

    /// Mutable access to a singular slot; `None` for accessories.
    pub fn slot_mut(&mut self, category: Category) -> Option<&mut Option<Component>> {
        match category {
            Category::Drone => Some(&mut self.drone),
            Category::Goggles => Some(&mut self.goggles),
            Category::Radio => Some(&mut self.radio),
            Category::Battery => Some(&mut self.battery),
            Category::Accessory => None,
        }
    }

    /// Every selected component, singular slots first.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        Category::SINGULAR
            .into_iter()
            .filter_map(move |category| self.slot(category))
            .chain(self.accessories.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// The identifiers stored when this snapshot is saved.
    pub fn component_ids(&self) -> BuildComponentIds {
        BuildComponentIds {
            drone: self.drone.as_ref().map(|c| c.id),
            goggles: self.goggles.as_ref().map(|c| c.id),
            radio: self.radio.as_ref().map(|c| c.id),
            battery: self.battery.as_ref().map(|c| c.id),
            accessories: self.accessories.iter().map(|c| c.id).collect(),
        }
    }
}

/// Component ids of a saved build, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildComponentIds {
    #[serde(default)]
    pub drone: Option<i64>,
    #[serde(default)]
    pub goggles: Option<i64>,
    #[serde(default)]
    pub radio: Option<i64>,
    #[serde(default)]
    pub battery: Option<i64>,
    #[serde(default)]
    pub accessories: Vec<i64>,
}

/// A persisted build referencing components by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBuild {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub component_ids: BuildComponentIds,
}

/// A saved build with every referenced id replaced by its component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub components: BuildSnapshot,
}

/// Request body for creating a saved build.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildRequest {
    pub name: String,
    /// Defaults to the time of insertion.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub component_ids: BuildComponentIds,
}

/// Request body for updating a saved build.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub component_ids: Option<BuildComponentIds>,
}

/// Request body for saving the current build.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCurrentBuildRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for putting a catalog component into the current build.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToBuildRequest {
    pub category: String,
    pub component_id: i64,
}

/// Query parameters for removing from the current build.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveFromBuildQuery {
    #[serde(default)]
    pub id: Option<i64>,
}
