use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(column_type = "Text")]
  pub title: String,
  #[sea_orm(column_type = "Text")]
  pub description: String,
  #[sea_orm(column_type = "Text")]
  pub image: String,
  /// Packed little-endian `f32` embedding, `None` until backfilled.
  #[sea_orm(column_type = "Blob", nullable)]
  pub emb: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
