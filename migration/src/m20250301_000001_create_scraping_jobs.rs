use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapingJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapingJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapingJobs::UserId).string().not_null())
                    .col(ColumnDef::new(ScrapingJobs::Prompt).text().not_null())
                    .col(ColumnDef::new(ScrapingJobs::SnapshotId).string())
                    .col(
                        ColumnDef::new(ScrapingJobs::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ScrapingJobs::Results).json())
                    .col(ColumnDef::new(ScrapingJobs::SeoReport).json())
                    .col(ColumnDef::new(ScrapingJobs::Error).text())
                    .col(
                        ColumnDef::new(ScrapingJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ScrapingJobs::CompletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraping_jobs_user_created")
                    .table(ScrapingJobs::Table)
                    .col(ScrapingJobs::UserId)
                    .col(ScrapingJobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraping_jobs_snapshot_id")
                    .table(ScrapingJobs::Table)
                    .col(ScrapingJobs::SnapshotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraping_jobs_status")
                    .table(ScrapingJobs::Table)
                    .col(ScrapingJobs::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapingJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ScrapingJobs {
    Table,
    Id,
    UserId,
    Prompt,
    SnapshotId,
    Status,
    Results,
    SeoReport,
    Error,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}
