//! Profile entity.
//!
//! Carries the contact fields shown on the citizen profile page plus the
//! server-side `role` column. The role is only ever read from this row,
//! never taken from client-supplied claims.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum AppRole {
    #[sea_orm(string_value = "citizen")]
    #[default]
    Citizen,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl AppRole {
    /// String form used in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Admin => "admin",
        }
    }
}

/// Profile model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Argon2 password hash
    #[sea_orm(nullable)]
    pub password: Option<String>,

    pub full_name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    pub city: String,

    pub state: String,

    #[sea_orm(nullable)]
    pub pincode: Option<String>,

    /// Role; determines admin privileges.
    pub role: AppRole,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
