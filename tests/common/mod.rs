use axum::Router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use template_api::{routes, TemplateService};

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let service = TemplateService::new(db);
    let (router, _api_docs) = utoipa_axum::router::OpenApiRouter::new()
        .nest("/api/v1/templates", routes::router(service))
        .split_for_parts();

    router
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTemplateTable)]
    }
}

pub struct CreateTemplateTable;

#[async_trait::async_trait]
impl MigrationName for CreateTemplateTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_template_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTemplateTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(TemplateTable)
            .if_not_exists()
            .col(
                ColumnDef::new(TemplateColumn::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(TemplateColumn::Name).string().not_null())
            .col(
                ColumnDef::new(TemplateColumn::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(TemplateColumn::BirthDate).date().not_null())
            .col(
                ColumnDef::new(TemplateColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TemplateColumn::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemplateTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum TemplateColumn {
    Id,
    Name,
    Email,
    BirthDate,
    CreatedAt,
    UpdatedAt,
}

impl Iden for TemplateColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Email => "email",
                Self::BirthDate => "birth_date",
                Self::CreatedAt => "created_at",
                Self::UpdatedAt => "updated_at",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct TemplateTable;

impl Iden for TemplateTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "templates").unwrap();
    }
}
