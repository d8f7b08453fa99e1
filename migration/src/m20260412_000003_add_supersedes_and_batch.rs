use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SeasonPriceRequests {
    Table,
    SupersedesId,
    NeedsReconciliation,
}

#[derive(DeriveIden)]
enum PriceOverrides {
    Table,
    BatchId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // supersedes_id: set when an approved request replaces an earlier
        // "done" tariff for the same room and year.
        manager
            .alter_table(
                Table::alter()
                    .table(SeasonPriceRequests::Table)
                    .add_column(
                        ColumnDef::new(SeasonPriceRequests::SupersedesId)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // needs_reconciliation: the channel manager accepted the blocks but
        // the local trace insert failed; an operator has to reconcile.
        manager
            .alter_table(
                Table::alter()
                    .table(SeasonPriceRequests::Table)
                    .add_column(
                        ColumnDef::new(SeasonPriceRequests::NeedsReconciliation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // batch_id groups the override rows written by a single apply.
        manager
            .alter_table(
                Table::alter()
                    .table(PriceOverrides::Table)
                    .add_column(ColumnDef::new(PriceOverrides::BatchId).uuid().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(PriceOverrides::Table)
                    .drop_column(PriceOverrides::BatchId)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(SeasonPriceRequests::Table)
                    .drop_column(SeasonPriceRequests::NeedsReconciliation)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(SeasonPriceRequests::Table)
                    .drop_column(SeasonPriceRequests::SupersedesId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
