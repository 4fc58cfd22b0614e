use sea_orm_migration::{prelude::*, schema::blob_null};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // packed little-endian f32, see `movierec_shared::blob`
    manager
      .alter_table(
        Table::alter()
          .table(Movie::Table)
          .add_column(blob_null(Movie::Emb))
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .alter_table(
        Table::alter()
          .table(Movie::Table)
          .drop_column(Movie::Emb)
          .to_owned(),
      )
      .await
  }
}

#[derive(Iden)]
pub enum Movie {
  Table,
  Emb,
}
