use sea_orm_migration::{
  prelude::*,
  schema::{pk_auto, text},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Movie::Table)
          .if_not_exists()
          .col(pk_auto(Movie::Id))
          .col(text(Movie::Title))
          .col(text(Movie::Description).default(""))
          .col(text(Movie::Image).default(""))
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_movie_title")
          .table(Movie::Table)
          .col(Movie::Title)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Movie::Table).to_owned())
      .await
  }
}

#[derive(Iden)]
pub enum Movie {
  Table,

  Id,
  Title,
  // synopsis, source text for the embedding
  Description,
  // poster path relative to the media root
  Image,
}
