//! Database repository for catalog components and saved builds.

use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::build::BuildSource;
use crate::errors::AppError;
use crate::models::{
    tags_from_value, BuildComponentIds, BuildSnapshot, Category, Component, CreateBuildRequest,
    CreateComponentRequest, ResolvedBuild, RevisionInfo, SavedBuild, UpdateBuildRequest,
    UpdateComponentRequest,
};

/// Starter catalog inserted into an empty database.
const SEED_CATALOG: &str = include_str!("seed_catalog.json");

const COMPONENT_COLUMNS: &str = "id, name, category, price, image, description, weight, \
     in_stock, specifications, compatible_with, purchase_url";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== COMPONENT OPERATIONS ====================

    /// List components, optionally restricted to one category.
    pub async fn list_components(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Component>, AppError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "SELECT {} FROM components WHERE category = ? ORDER BY id",
                    COMPONENT_COLUMNS
                ))
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM components ORDER BY id",
                    COMPONENT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(component_from_row).collect()
    }

    /// Get a component by ID.
    pub async fn get_component(&self, id: i64) -> Result<Option<Component>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM components WHERE id = ?",
            COMPONENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(component_from_row).transpose()
    }

    /// Number of components in the catalog.
    pub async fn count_components(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM components")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Create a new component.
    pub async fn create_component(
        &self,
        request: &CreateComponentRequest,
    ) -> Result<Component, AppError> {
        let specifications_json = serde_json::to_string(&request.specifications)?;
        let tags_json = serde_json::to_string(&request.compatible_with)?;

        let result = sqlx::query(
            r#"INSERT INTO components (
                name, category, price, image, description, weight,
                in_stock, specifications, compatible_with, purchase_url
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&request.name)
        .bind(request.category.as_str())
        .bind(request.price)
        .bind(&request.image)
        .bind(&request.description)
        .bind(request.weight)
        .bind(request.in_stock as i32)
        .bind(&specifications_json)
        .bind(&tags_json)
        .bind(&request.purchase_url)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Component {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            category: request.category,
            price: request.price,
            image: request.image.clone(),
            description: request.description.clone(),
            weight: request.weight,
            in_stock: request.in_stock,
            specifications: request.specifications.clone(),
            compatible_with: request.compatible_with.clone(),
            purchase_url: request.purchase_url.clone(),
        })
    }

    /// Update a component. The category can never change.
    pub async fn update_component(
        &self,
        id: i64,
        request: &UpdateComponentRequest,
    ) -> Result<Component, AppError> {
        let existing = self
            .get_component(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Component {} not found", id)))?;

        request.validate(&existing)?;

        let updated = Component {
            id,
            name: request.name.clone().unwrap_or(existing.name),
            category: existing.category,
            price: request.price.unwrap_or(existing.price),
            image: request.image.clone().unwrap_or(existing.image),
            description: request.description.clone().unwrap_or(existing.description),
            weight: request.weight.unwrap_or(existing.weight),
            in_stock: request.in_stock.unwrap_or(existing.in_stock),
            specifications: request
                .specifications
                .clone()
                .unwrap_or(existing.specifications),
            compatible_with: request
                .compatible_with
                .clone()
                .unwrap_or(existing.compatible_with),
            purchase_url: request
                .purchase_url
                .clone()
                .unwrap_or(existing.purchase_url),
        };

        let specifications_json = serde_json::to_string(&updated.specifications)?;
        let tags_json = serde_json::to_string(&updated.compatible_with)?;

        sqlx::query(
            r#"UPDATE components SET
                name = ?, price = ?, image = ?, description = ?, weight = ?,
                in_stock = ?, specifications = ?, compatible_with = ?, purchase_url = ?
            WHERE id = ?"#,
        )
        .bind(&updated.name)
        .bind(updated.price)
        .bind(&updated.image)
        .bind(&updated.description)
        .bind(updated.weight)
        .bind(updated.in_stock as i32)
        .bind(&specifications_json)
        .bind(&tags_json)
        .bind(&updated.purchase_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;
        Ok(updated)
    }

    /// Delete a component. Returns false when it did not exist.
    pub async fn delete_component(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM components WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        self.increment_revision().await?;
        Ok(true)
    }

    /// Insert the starter catalog when no component exists yet.
    /// Returns the number of inserted components.
    pub async fn seed_catalog(&self) -> Result<usize, AppError> {
        if self.count_components().await? > 0 {
            return Ok(0);
        }

        let seed: Vec<CreateComponentRequest> = serde_json::from_str(SEED_CATALOG)?;
        for request in &seed {
            self.create_component(request).await?;
        }

        Ok(seed.len())
    }

    // ==================== BUILD OPERATIONS ====================

    /// List all saved builds, oldest first.
    pub async fn list_builds(&self) -> Result<Vec<SavedBuild>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, created_at, component_ids FROM builds ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(build_from_row).collect())
    }

    /// Get a saved build by ID.
    pub async fn get_build(&self, id: i64) -> Result<Option<SavedBuild>, AppError> {
        let row = sqlx::query("SELECT id, name, created_at, component_ids FROM builds WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(build_from_row))
    }

    /// Create a saved build.
    pub async fn create_build(&self, request: &CreateBuildRequest) -> Result<SavedBuild, AppError> {
        let created_at = request
            .created_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let ids_json = serde_json::to_string(&request.component_ids)?;

        let result =
            sqlx::query("INSERT INTO builds (name, created_at, component_ids) VALUES (?, ?, ?)")
                .bind(&request.name)
                .bind(&created_at)
                .bind(&ids_json)
                .execute(&self.pool)
                .await?;

        self.increment_revision().await?;

        Ok(SavedBuild {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            created_at,
            component_ids: request.component_ids.clone(),
        })
    }

    /// Rename a saved build or replace its component ids.
    pub async fn update_build(
        &self,
        id: i64,
        request: &UpdateBuildRequest,
    ) -> Result<SavedBuild, AppError> {
        let existing = self
            .get_build(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Build {} not found", id)))?;

        let updated = SavedBuild {
            id,
            name: request.name.clone().unwrap_or(existing.name),
            created_at: existing.created_at,
            component_ids: request
                .component_ids
                .clone()
                .unwrap_or(existing.component_ids),
        };
        let ids_json = serde_json::to_string(&updated.component_ids)?;

        sqlx::query("UPDATE builds SET name = ?, component_ids = ? WHERE id = ?")
            .bind(&updated.name)
            .bind(&ids_json)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.increment_revision().await?;
        Ok(updated)
    }

    /// Delete a saved build. Returns false when it did not exist.
    pub async fn delete_build(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM builds WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        self.increment_revision().await?;
        Ok(true)
    }

    /// Get a saved build with its components looked up.
    ///
    /// Missing singular components resolve to `None`; missing accessories are
    /// dropped from the list, and a repeated accessory id resolves once.
    pub async fn get_build_resolved(&self, id: i64) -> Result<Option<ResolvedBuild>, AppError> {
        let Some(build) = self.get_build(id).await? else {
            return Ok(None);
        };
        let ids = &build.component_ids;

        let mut seen = HashSet::new();
        let mut accessories = Vec::with_capacity(ids.accessories.len());
        for accessory_id in &ids.accessories {
            if !seen.insert(*accessory_id) {
                continue;
            }
            if let Some(accessory) = self.get_component(*accessory_id).await? {
                accessories.push(accessory);
            }
        }

        let components = BuildSnapshot {
            drone: self.resolve_slot(ids.drone).await?,
            goggles: self.resolve_slot(ids.goggles).await?,
            radio: self.resolve_slot(ids.radio).await?,
            battery: self.resolve_slot(ids.battery).await?,
            accessories,
        };

        Ok(Some(ResolvedBuild {
            id: build.id,
            name: build.name,
            created_at: build.created_at,
            components,
        }))
    }

    async fn resolve_slot(&self, id: Option<i64>) -> Result<Option<Component>, AppError> {
        match id {
            Some(id) => self.get_component(id).await,
            None => Ok(None),
        }
    }
}

impl BuildSource for Repository {
    async fn resolve_build(&self, id: i64) -> Result<Option<ResolvedBuild>, AppError> {
        self.get_build_resolved(id).await
    }
}

// Helper functions for row conversion

fn component_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Component, AppError> {
    let id: i64 = row.get("id");
    let category_str: String = row.get("category");
    let category: Category = category_str.parse().map_err(|_| {
        AppError::Internal(format!(
            "Component {} has invalid category {:?}",
            id, category_str
        ))
    })?;
    let in_stock: i32 = row.get("in_stock");
    let specifications_str: String = row.get("specifications");
    let tags_str: String = row.get("compatible_with");

    Ok(Component {
        id,
        name: row.get("name"),
        category,
        price: row.get("price"),
        image: row.get("image"),
        description: row.get("description"),
        weight: row.get("weight"),
        in_stock: in_stock != 0,
        specifications: serde_json::from_str(&specifications_str).unwrap_or_default(),
        compatible_with: parse_tags(&tags_str),
        purchase_url: row.get("purchase_url"),
    })
}

fn build_from_row(row: &sqlx::sqlite::SqliteRow) -> SavedBuild {
    let ids_str: String = row.get("component_ids");
    SavedBuild {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        component_ids: parse_component_ids(&ids_str),
    }
}

fn parse_tags(s: &str) -> Vec<String> {
    serde_json::from_str::<Value>(s)
        .map(|value| tags_from_value(&value))
        .unwrap_or_default()
}

fn parse_component_ids(s: &str) -> BuildComponentIds {
    serde_json::from_str(s).unwrap_or_default()
}
