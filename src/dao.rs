//! Persistence access for the template resource.
//!
//! This is the only module that touches Sea-ORM queries. It also declares
//! the contract the query translator enforces: which columns may be
//! filtered and sorted, and how large a page may get. `get_by_id`, `update`
//! and `delete` signal a missing record by returning `Ok(None)`; deciding
//! what that means is left to the service layer.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::{ActiveModel, Column, Entity, Model};
use crate::models::{TemplateCreate, TemplateUpdate};

pub struct TemplateDao;

impl TemplateDao {
    pub const MAX_PAGE_SIZE: u64 = 100;
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_PER_PAGE: u64 = 25;

    #[must_use]
    pub fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
        ]
    }

    #[must_use]
    pub fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
            ("birth_date", Column::BirthDate),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    /// Columns matched by contains rather than equality, including the
    /// free-text `q` search.
    #[must_use]
    pub fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name", "email"]
    }

    #[must_use]
    pub fn default_sort_column() -> Column {
        Column::Id
    }

    /// Fetch one page of matching records.
    ///
    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn list(
        db: &DatabaseConnection,
        condition: Condition,
        order_column: Column,
        order: Order,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(condition)
            .order_by(order_column, order)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await
    }

    /// Count records matching the same condition as [`Self::list`].
    ///
    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn count(db: &DatabaseConnection, condition: Condition) -> Result<u64, DbErr> {
        Entity::find().filter(condition).count(db).await
    }

    /// Count all records, no filters.
    ///
    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Insert a new record, generating its id and timestamps, and read the
    /// stored row back.
    ///
    /// # Errors
    ///
    /// Propagates any database error, including the unique-email violation.
    pub async fn create(db: &DatabaseConnection, input: TemplateCreate) -> Result<Model, DbErr> {
        let now = Utc::now();
        let record = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            birth_date: Set(input
                .birth_date
                .parse()
                .map_err(|err| DbErr::Type(format!("birth_date: {err}")))?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = Entity::insert(record).exec(db).await?;
        Entity::find_by_id(result.last_insert_id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("template missing after insert".to_string()))
    }

    /// Merge the supplied fields into an existing record and refresh its
    /// `updated_at`. Returns `Ok(None)` when no record matches.
    ///
    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: TemplateUpdate,
    ) -> Result<Option<Model>, DbErr> {
        let Some(existing) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut record = existing.into_active_model();
        if let Some(Some(name)) = input.name {
            record.name = Set(name);
        }
        if let Some(Some(email)) = input.email {
            record.email = Set(email);
        }
        if let Some(Some(birth_date)) = input.birth_date {
            record.birth_date = Set(birth_date
                .parse()
                .map_err(|err| DbErr::Type(format!("birth_date: {err}")))?);
        }
        record.updated_at = Set(Utc::now());

        let updated = record.update(db).await?;
        Ok(Some(updated))
    }

    /// Remove a record, returning its prior state. Returns `Ok(None)` when
    /// no record matches.
    ///
    /// # Errors
    ///
    /// Propagates any database error.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
        let Some(existing) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        Entity::delete_by_id(id).exec(db).await?;
        Ok(Some(existing))
    }
}
