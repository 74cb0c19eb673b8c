//! Menu item repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::MenuItem;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::client::{MenuItemCreate, MenuItemUpdate};
use shared::models::Station;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active menu items, grouped for display
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE active = true ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find one menu item by id (with or without the table prefix)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        let item: Option<MenuItem> = self.base.db().select(record_id).await?;
        Ok(item)
    }

    /// Resolve a batch of ids at once (order validation)
    ///
    /// Ids that do not parse or do not exist are simply absent from the
    /// result; the caller decides what missing means.
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<MenuItem>> {
        let record_ids: Vec<surrealdb::RecordId> = ids
            .iter()
            .filter_map(|id| parse_record_id(TABLE, id))
            .collect();

        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE id IN $ids")
            .bind(("ids", record_ids))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find a menu item by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<MenuItem>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation(
                "Menu item price must be non-negative".to_string(),
            ));
        }

        // Duplicate names confuse tickets; reject them
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                data.name
            )));
        }

        let item = MenuItem {
            id: None,
            name: data.name,
            price: data.price,
            category: data.category,
            station: data.station,
            active: true,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(price) = data.price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation(
                "Menu item price must be non-negative".to_string(),
            ));
        }

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                new_name
            )));
        }

        #[derive(Serialize)]
        struct MenuItemUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            station: Option<Station>,
            #[serde(skip_serializing_if = "Option::is_none")]
            active: Option<bool>,
        }

        let update_data = MenuItemUpdateDb {
            name: data.name,
            price: data.price,
            category: data.category,
            station: data.station,
            active: data.active,
        };

        let record_id = parse_record_id(TABLE, id)
            .ok_or_else(|| RepoError::Validation(format!("Invalid menu item id: {}", id)))?;

        let updated: Option<MenuItem> = self
            .base
            .db()
            .update(record_id)
            .merge(update_data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Soft-delete a menu item (historical orders keep their snapshots)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(TABLE, id)
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        #[derive(Serialize)]
        struct Deactivate {
            active: bool,
        }

        let updated: Option<MenuItem> = self
            .base
            .db()
            .update(record_id)
            .merge(Deactivate { active: false })
            .await?;

        Ok(updated.is_some())
    }
}
