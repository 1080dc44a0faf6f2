//! Service layer for the template resource.
//!
//! The single authoritative contract between the transport layer and
//! persistence: translates list queries, enforces not-found semantics,
//! re-checks every record read back from storage, and records every
//! operation's outcome with its wall-clock duration.

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::dao::TemplateDao;
use crate::errors::ApiError;
use crate::models::{Template, TemplateCreate, TemplateUpdate};
use crate::pagination::Paginated;
use crate::query;

/// Constructed once at process start and handed to the router.
#[derive(Clone)]
pub struct TemplateService {
    db: DatabaseConnection,
}

impl TemplateService {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List templates matching the raw query-string parameters.
    ///
    /// The page of records and the total matching count are fetched
    /// concurrently; both must succeed.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when query translation rejects the input (before
    /// any persistence call), otherwise persistence or output-schema
    /// failures.
    pub async fn list(
        &self,
        raw_query: &HashMap<String, String>,
    ) -> Result<Paginated<Template>, ApiError> {
        let started = Instant::now();
        debug!(query = ?raw_query, "fetching templates");

        let params = query::translate(raw_query).map_err(|violations| {
            warn!(?violations, "invalid template list query");
            ApiError::validation_failed(violations)
        })?;

        let (records, total) = tokio::try_join!(
            TemplateDao::list(
                &self.db,
                params.condition.clone(),
                params.order_column,
                params.order.clone(),
                params.offset(),
                params.limit(),
            ),
            TemplateDao::count(&self.db, params.condition.clone()),
        )
        .map_err(|err| {
            error!(error = %err, elapsed_ms = elapsed_ms(started), "failed to fetch templates");
            ApiError::from(err)
        })?;

        let templates = records
            .into_iter()
            .map(Template::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::shape)?;

        info!(
            returned = templates.len(),
            total,
            elapsed_ms = elapsed_ms(started),
            "retrieved templates"
        );
        Ok(Paginated::new(templates, total, params.page, params.per_page))
    }

    /// Total number of templates, no filters.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn count(&self) -> Result<u64, ApiError> {
        let started = Instant::now();
        debug!("fetching templates count");

        let count = TemplateDao::count_all(&self.db).await.map_err(|err| {
            error!(error = %err, elapsed_ms = elapsed_ms(started), "failed to fetch templates count");
            ApiError::from(err)
        })?;

        info!(count, elapsed_ms = elapsed_ms(started), "retrieved templates count");
        Ok(count)
    }

    /// # Errors
    ///
    /// `NotFound` when no record exists for `id`.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Template, ApiError> {
        let started = Instant::now();
        debug!(%id, "fetching template");

        let record = TemplateDao::get_by_id(&self.db, id).await.map_err(|err| {
            error!(error = %err, %id, elapsed_ms = elapsed_ms(started), "failed to fetch template");
            ApiError::from(err)
        })?;

        let Some(record) = record else {
            warn!(%id, "template not found");
            return Err(ApiError::not_found("Template"));
        };

        let template = Template::parse(record).map_err(ApiError::shape)?;
        info!(%id, elapsed_ms = elapsed_ms(started), "retrieved template");
        Ok(template)
    }

    /// Create a template. Uniqueness is not pre-checked; a conflict is
    /// surfaced as whatever the persistence layer raises.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures, including uniqueness conflicts.
    pub async fn create(&self, input: TemplateCreate) -> Result<Template, ApiError> {
        let started = Instant::now();
        debug!(name = %input.name, "creating template");

        let record = TemplateDao::create(&self.db, input).await.map_err(|err| {
            error!(error = %err, elapsed_ms = elapsed_ms(started), "failed to create template");
            ApiError::from(err)
        })?;

        let template = Template::parse(record).map_err(ApiError::shape)?;
        info!(id = %template.id, elapsed_ms = elapsed_ms(started), "created template");
        Ok(template)
    }

    /// Partially update a template; absent fields are left untouched.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists for `id`.
    pub async fn update(&self, id: Uuid, input: TemplateUpdate) -> Result<Template, ApiError> {
        let started = Instant::now();
        debug!(%id, "updating template");

        let record = TemplateDao::update(&self.db, id, input).await.map_err(|err| {
            error!(error = %err, %id, elapsed_ms = elapsed_ms(started), "failed to update template");
            ApiError::from(err)
        })?;

        let Some(record) = record else {
            warn!(%id, "template not found for update");
            return Err(ApiError::not_found("Template"));
        };

        let template = Template::parse(record).map_err(ApiError::shape)?;
        info!(%id, elapsed_ms = elapsed_ms(started), "updated template");
        Ok(template)
    }

    /// Delete a template, returning its last known state.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists for `id`.
    pub async fn delete(&self, id: Uuid) -> Result<Template, ApiError> {
        let started = Instant::now();
        debug!(%id, "deleting template");

        let record = TemplateDao::delete(&self.db, id).await.map_err(|err| {
            error!(error = %err, %id, elapsed_ms = elapsed_ms(started), "failed to delete template");
            ApiError::from(err)
        })?;

        let Some(record) = record else {
            warn!(%id, "template not found for deletion");
            return Err(ApiError::not_found("Template"));
        };

        let template = Template::parse(record).map_err(ApiError::shape)?;
        info!(%id, elapsed_ms = elapsed_ms(started), "deleted template");
        Ok(template)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
