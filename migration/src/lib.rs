pub use sea_orm_migration::prelude::*;

mod m20260310_000001_initial;
mod m20260324_000002_unique_pending_request;
mod m20260412_000003_add_supersedes_and_batch;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260310_000001_initial::Migration),
            Box::new(m20260324_000002_unique_pending_request::Migration),
            Box::new(m20260412_000003_add_supersedes_and_batch::Migration),
        ]
    }
}
