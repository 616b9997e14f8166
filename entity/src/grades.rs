use sea_orm::{entity::prelude::*, QueryOrder};
use serde::{Deserialize, Serialize};

pub mod constraints {
    pub const UC_GRADES_CODE: &str = "UC_grades_code";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: GradeCode,
    pub name: String,
    pub order: i32,
}

/// The six school years a problem can belong to.
#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(10))")]
#[serde(rename_all = "lowercase")]
pub enum GradeCode {
    #[sea_orm(string_value = "junior1")]
    Junior1,
    #[sea_orm(string_value = "junior2")]
    Junior2,
    #[sea_orm(string_value = "junior3")]
    Junior3,
    #[sea_orm(string_value = "high1")]
    High1,
    #[sea_orm(string_value = "high2")]
    High2,
    #[sea_orm(string_value = "high3")]
    High3,
}

impl GradeCode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Junior1 => "中学1年",
            Self::Junior2 => "中学2年",
            Self::Junior3 => "中学3年",
            Self::High1 => "高校1年",
            Self::High2 => "高校2年",
            Self::High3 => "高校3年",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    #[inline]
    pub fn find_ordered() -> Select<Entity> {
        Self::find()
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Id)
    }
}
