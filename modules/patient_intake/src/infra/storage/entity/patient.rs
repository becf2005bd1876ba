use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// One row per patient. Medical-aid columns are NULL for CASH patients.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub id_number: String,
    pub payment_type: String,
    pub home_address: Option<String>,
    pub medical_aid_holder_full_name: Option<String>,
    pub medical_aid_holder_id_number: Option<String>,
    pub medical_aid_holder_phone: Option<String>,
    pub medical_aid_holder_second_phone: Option<String>,
    pub medical_aid_name: Option<String>,
    pub medical_aid_number: Option<String>,
    pub medical_aid_plan: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dependant::Entity")]
    Dependants,
}

impl Related<super::dependant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dependants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
