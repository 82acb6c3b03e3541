//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Larder:
//!
//! - `items`: countable inventory items with tiered counting units
//! - `locations`: storage locations counts are taken in
//! - `location_map`: item-to-location assignments
//! - `inventory_sessions`: bounded counting exercises
//! - `session_counts`: valued count records per (session, location, item)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Nickname,
    Category,
    Vendor,
    PurchaseUnit,
    Tier1Unit,
    Tier1Factor,
    Tier2Unit,
    Tier2Factor,
    Tier3Unit,
    Tier3Factor,
    MasterUnit,
    PriceCents,
    LastCostCents,
    ParLevel,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum LocationMap {
    Table,
    LocationId,
    ItemId,
}

#[derive(Iden)]
enum InventorySessions {
    Table,
    Id,
    CountType,
    Status,
    StartedAt,
    EndedAt,
    OpenMarker,
}

#[derive(Iden)]
enum SessionCounts {
    Table,
    SessionId,
    LocationId,
    ItemId,
    Count,
    ValueCents,
    Tier1Count,
    Tier2Count,
    Tier3Count,
    CountedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Items::Nickname).string().not_null())
                    .col(ColumnDef::new(Items::Category).string())
                    .col(ColumnDef::new(Items::Vendor).string())
                    .col(ColumnDef::new(Items::PurchaseUnit).string())
                    .col(ColumnDef::new(Items::Tier1Unit).string())
                    .col(ColumnDef::new(Items::Tier1Factor).double())
                    .col(ColumnDef::new(Items::Tier2Unit).string())
                    .col(ColumnDef::new(Items::Tier2Factor).double())
                    .col(ColumnDef::new(Items::Tier3Unit).string())
                    .col(ColumnDef::new(Items::Tier3Factor).double())
                    .col(ColumnDef::new(Items::MasterUnit).string())
                    .col(ColumnDef::new(Items::PriceCents).big_integer())
                    .col(ColumnDef::new(Items::LastCostCents).big_integer())
                    .col(ColumnDef::new(Items::ParLevel).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-items-nickname-unique")
                    .table(Items::Table)
                    .col(Items::Nickname)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Locations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-locations-name-unique")
                    .table(Locations::Table)
                    .col(Locations::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Location map (item assignments)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LocationMap::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LocationMap::LocationId).string().not_null())
                    .col(ColumnDef::new(LocationMap::ItemId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(LocationMap::LocationId)
                            .col(LocationMap::ItemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-location_map-location_id")
                            .from(LocationMap::Table, LocationMap::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-location_map-item_id")
                            .from(LocationMap::Table, LocationMap::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-location_map-item_id")
                    .table(LocationMap::Table)
                    .col(LocationMap::ItemId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Inventory sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(InventorySessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventorySessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventorySessions::CountType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventorySessions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventorySessions::StartedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventorySessions::EndedAt).timestamp())
                    // NULL once finalized; the unique index below only bites
                    // while a session is open (NULLs are exempt), so at most
                    // one session can be in progress at a time.
                    .col(ColumnDef::new(InventorySessions::OpenMarker).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inventory_sessions-open_marker-unique")
                    .table(InventorySessions::Table)
                    .col(InventorySessions::OpenMarker)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inventory_sessions-status-ended_at")
                    .table(InventorySessions::Table)
                    .col(InventorySessions::Status)
                    .col(InventorySessions::EndedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Session counts
        // ───────────────────────────────────────────────────────────────────
        // item_id and location_id are deliberately not FK-backed: count rows
        // are historical snapshots and must survive item/location deletion.
        manager
            .create_table(
                Table::create()
                    .table(SessionCounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionCounts::SessionId).string().not_null())
                    .col(
                        ColumnDef::new(SessionCounts::LocationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SessionCounts::ItemId).string().not_null())
                    .col(ColumnDef::new(SessionCounts::Count).double().not_null())
                    .col(
                        ColumnDef::new(SessionCounts::ValueCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionCounts::Tier1Count)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionCounts::Tier2Count)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionCounts::Tier3Count)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionCounts::CountedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SessionCounts::SessionId)
                            .col(SessionCounts::LocationId)
                            .col(SessionCounts::ItemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_counts-session_id")
                            .from(SessionCounts::Table, SessionCounts::SessionId)
                            .to(InventorySessions::Table, InventorySessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-session_counts-session_id-location_id")
                    .table(SessionCounts::Table)
                    .col(SessionCounts::SessionId)
                    .col(SessionCounts::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-session_counts-item_id")
                    .table(SessionCounts::Table)
                    .col(SessionCounts::ItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(SessionCounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventorySessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LocationMap::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        Ok(())
    }
}
