use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "penjualan_sampah")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub kategori: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub berat: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub harga_per_kg: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub total_harga: Option<Decimal>,
    pub opsi_pengiriman: Option<String>,
    pub tanggal_awal: Option<Date>,
    pub tanggal_akhir: Option<Date>,
    pub alamat_admin_id: Option<i32>,
    pub alamat_user_id: Option<i32>,
    pub rekening_id: Option<i32>,
    pub gambar: String,
    pub bukti_transaksi: Option<String>,
    pub alasan_penolakan: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub ongkir: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub jarak_estimasi_km: Option<Decimal>,
    pub status: StatusPengajuan,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::rekening::Entity",
        from = "Column::RekeningId",
        to = "super::rekening::Column::Id"
    )]
    Rekening,
    #[sea_orm(
        belongs_to = "super::alamat::Entity",
        from = "Column::AlamatAdminId",
        to = "super::alamat::Column::Id"
    )]
    AlamatAdmin,
    #[sea_orm(
        belongs_to = "super::alamat::Entity",
        from = "Column::AlamatUserId",
        to = "super::alamat::Column::Id"
    )]
    AlamatUser,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::rekening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rekening.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Submission lifecycle status. Stored as the exact wire strings the mobile
/// clients already know, including the embedded spaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum StatusPengajuan {
    #[sea_orm(string_value = "pengajuan")]
    Pengajuan,
    #[sea_orm(string_value = "pengajuan diterima")]
    PengajuanDiterima,
    #[sea_orm(string_value = "pengajuan ditolak")]
    PengajuanDitolak,
    #[sea_orm(string_value = "penawaran diterima")]
    PenawaranDiterima,
    #[sea_orm(string_value = "penawaran ditolak")]
    PenawaranDitolak,
    #[sea_orm(string_value = "selesai")]
    Selesai,
}

impl StatusPengajuan {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StatusPengajuan::PengajuanDitolak
                | StatusPengajuan::PenawaranDitolak
                | StatusPengajuan::Selesai
        )
    }

    /// The full transition table. Everything not listed here is an illegal
    /// move and must be refused by the caller.
    pub fn can_transition_to(self, next: StatusPengajuan) -> bool {
        use StatusPengajuan::*;
        matches!(
            (self, next),
            (Pengajuan, PengajuanDiterima)
                | (Pengajuan, PengajuanDitolak)
                | (PengajuanDiterima, PenawaranDiterima)
                | (PengajuanDiterima, PenawaranDitolak)
                | (PenawaranDiterima, Selesai)
        )
    }

    /// The wire string, e.g. `"pengajuan diterima"`.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusPengajuan::Pengajuan => "pengajuan",
            StatusPengajuan::PengajuanDiterima => "pengajuan diterima",
            StatusPengajuan::PengajuanDitolak => "pengajuan ditolak",
            StatusPengajuan::PenawaranDiterima => "penawaran diterima",
            StatusPengajuan::PenawaranDitolak => "penawaran ditolak",
            StatusPengajuan::Selesai => "selesai",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pengajuan" => Some(StatusPengajuan::Pengajuan),
            "pengajuan diterima" => Some(StatusPengajuan::PengajuanDiterima),
            "pengajuan ditolak" => Some(StatusPengajuan::PengajuanDitolak),
            "penawaran diterima" => Some(StatusPengajuan::PenawaranDiterima),
            "penawaran ditolak" => Some(StatusPengajuan::PenawaranDitolak),
            "selesai" => Some(StatusPengajuan::Selesai),
            _ => None,
        }
    }
}
