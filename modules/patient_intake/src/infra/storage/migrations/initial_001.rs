use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Patients::FullName).string().not_null())
                    .col(ColumnDef::new(Patients::IdNumber).string().not_null())
                    .col(ColumnDef::new(Patients::PaymentType).string().not_null())
                    .col(ColumnDef::new(Patients::HomeAddress).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidHolderFullName).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidHolderIdNumber).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidHolderPhone).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidHolderSecondPhone).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidName).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidNumber).string().null())
                    .col(ColumnDef::new(Patients::MedicalAidPlan).string().null())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PatientDependants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PatientDependants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PatientDependants::PatientId).uuid().not_null())
                    .col(ColumnDef::new(PatientDependants::Position).integer().not_null())
                    .col(ColumnDef::new(PatientDependants::FullName).string().not_null())
                    .col(ColumnDef::new(PatientDependants::Gender).string().null())
                    .col(ColumnDef::new(PatientDependants::DateOfBirth).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patient_dependants_patient")
                            .from(PatientDependants::Table, PatientDependants::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patient_dependants_patient_position")
                    .table(PatientDependants::Table)
                    .col(PatientDependants::PatientId)
                    .col(PatientDependants::Position)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PatientDependants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    FullName,
    IdNumber,
    PaymentType,
    HomeAddress,
    MedicalAidHolderFullName,
    MedicalAidHolderIdNumber,
    MedicalAidHolderPhone,
    MedicalAidHolderSecondPhone,
    MedicalAidName,
    MedicalAidNumber,
    MedicalAidPlan,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PatientDependants {
    Table,
    Id,
    PatientId,
    Position,
    FullName,
    Gender,
    DateOfBirth,
}
