use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Profiles {
    Table,
    UserId,
    FullName,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    UserId,
    Name,
    CmRoomTypeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SeasonPriceRequests {
    Table,
    Id,
    UserId,
    SeasonYear,
    RoomId,
    RoomName,
    Items,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PriceOverrides {
    Table,
    Id,
    UserId,
    RoomId,
    RoomName,
    StartDate,
    EndDate,
    Price,
    Closed,
    MinStay,
    ClosedOnArrival,
    ClosedOnDeparture,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("season_request_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("done"),
                        Alias::new("rejected"),
                    ])
                    .to_owned(),
            )
            .await?;

        // Read-only mirror of the auth provider's profile records.
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Profiles::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Read-only mirror of the booking system's room listing.
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Rooms::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Rooms::CmRoomTypeId).string_len(64).null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rooms_user")
                    .table(Rooms::Table)
                    .col(Rooms::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeasonPriceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeasonPriceRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::SeasonYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::RoomName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::Items)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::Status)
                            .custom(Alias::new("season_request_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::season_request_status")),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SeasonPriceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_season_price_requests_room_year")
                    .table(SeasonPriceRequests::Table)
                    .col(SeasonPriceRequests::RoomId)
                    .col(SeasonPriceRequests::SeasonYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_season_price_requests_status")
                    .table(SeasonPriceRequests::Table)
                    .col(SeasonPriceRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PriceOverrides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceOverrides::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PriceOverrides::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceOverrides::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceOverrides::RoomName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceOverrides::StartDate).date().not_null())
                    .col(ColumnDef::new(PriceOverrides::EndDate).date().not_null())
                    .col(ColumnDef::new(PriceOverrides::Price).integer().null())
                    .col(ColumnDef::new(PriceOverrides::Closed).boolean().null())
                    .col(ColumnDef::new(PriceOverrides::MinStay).integer().null())
                    .col(
                        ColumnDef::new(PriceOverrides::ClosedOnArrival)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PriceOverrides::ClosedOnDeparture)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PriceOverrides::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_price_overrides_user")
                    .table(PriceOverrides::Table)
                    .col(PriceOverrides::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_price_overrides_room")
                    .table(PriceOverrides::Table)
                    .col(PriceOverrides::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_price_overrides_created_at")
                    .table(PriceOverrides::Table)
                    .col(PriceOverrides::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PriceOverrides::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SeasonPriceRequests::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .name(Alias::new("season_request_status"))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
