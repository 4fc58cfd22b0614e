pub use sea_orm_migration::*;

mod m20260301_01_create_movie_table;
mod m20260302_01_add_emb_to_movie;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_01_create_movie_table::Migration),
      Box::new(m20260302_01_add_emb_to_movie::Migration),
    ]
  }
}
