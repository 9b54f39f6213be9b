use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nama_lengkap: String,
    pub email: String,
    pub no_hp: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::alamat::Entity")]
    Alamat,
    #[sea_orm(has_many = "super::rekening::Entity")]
    Rekening,
    #[sea_orm(has_many = "super::penjualan_sampah::Entity")]
    PenjualanSampah,
}

impl Related<super::alamat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alamat.def()
    }
}

impl Related<super::rekening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rekening.def()
    }
}

impl Related<super::penjualan_sampah::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PenjualanSampah.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
