use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Columns shared by many tables
#[derive(Iden)]
enum Shared {
    Id,
    DesignationAr,
    DesignationEn,
    DesignationFr,
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}

fn audited(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Shared::CreatedBy).string().not_null())
        .col(ColumnDef::new(Shared::CreatedAt).timestamp().not_null())
        .col(ColumnDef::new(Shared::UpdatedBy).string().not_null())
        .col(ColumnDef::new(Shared::UpdatedAt).timestamp().not_null())
}

/// Id plus the three designations, French required
fn designated<T: Iden + 'static>(name: T) -> TableCreateStatement {
    let mut table = Table::create();
    table
        .table(name)
        .if_not_exists()
        .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Shared::DesignationAr).string())
        .col(ColumnDef::new(Shared::DesignationEn).string())
        .col(ColumnDef::new(Shared::DesignationFr).string().not_null());
    table
}

fn unique_designation<T: Iden + 'static>(name: &str, table: T) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(Shared::DesignationFr)
        .unique()
        .if_not_exists()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Designation-only reference tables
        for mut table in [
            designated(ApprovalStatuses::Table),
            designated(RealizationStatuses::Table),
            designated(RealizationNatures::Table),
            designated(RealizationDirectors::Table),
            designated(BudgetTypes::Table),
            designated(ExclusionTypes::Table),
            designated(ConsultationPhases::Table),
        ] {
            manager.create_table(audited(&mut table).to_owned()).await?;
        }

        let mut award_methods = designated(AwardMethods::Table);
        award_methods
            .col(ColumnDef::new(AwardMethods::AcronymAr).string())
            .col(ColumnDef::new(AwardMethods::AcronymEn).string())
            .col(ColumnDef::new(AwardMethods::AcronymFr).string().not_null());
        manager
            .create_table(audited(&mut award_methods).to_owned())
            .await?;

        let mut steps = designated(ConsultationSteps::Table);
        steps
            .col(ColumnDef::new(ConsultationSteps::PhaseId).uuid().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-consultation_steps-phase_id")
                    .from(ConsultationSteps::Table, ConsultationSteps::PhaseId)
                    .to(ConsultationPhases::Table, Shared::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        manager.create_table(audited(&mut steps).to_owned()).await?;

        // Providers and what hangs off them
        let mut providers = Table::create();
        providers
            .table(Providers::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Providers::CompanyName).string().not_null())
            .col(ColumnDef::new(Providers::TaxId).string())
            .col(ColumnDef::new(Providers::TradeRegister).string())
            .col(ColumnDef::new(Providers::Address).text())
            .col(ColumnDef::new(Providers::Phone).string())
            .col(ColumnDef::new(Providers::Email).string());
        manager
            .create_table(audited(&mut providers).to_owned())
            .await?;

        let mut representators = Table::create();
        representators
            .table(ProviderRepresentators::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
            .col(
                ColumnDef::new(ProviderRepresentators::ProviderId)
                    .uuid()
                    .not_null(),
            )
            .col(
                ColumnDef::new(ProviderRepresentators::LastName)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(ProviderRepresentators::FirstName)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(ProviderRepresentators::Function).string())
            .col(ColumnDef::new(ProviderRepresentators::Phone).string())
            .col(ColumnDef::new(ProviderRepresentators::Email).string())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-provider_representators-provider_id")
                    .from(
                        ProviderRepresentators::Table,
                        ProviderRepresentators::ProviderId,
                    )
                    .to(Providers::Table, Shared::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager
            .create_table(audited(&mut representators).to_owned())
            .await?;

        let mut clearances = Table::create();
        clearances
            .table(Clearances::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Clearances::ProviderId).uuid().not_null())
            .col(ColumnDef::new(Clearances::Reference).string().not_null())
            .col(ColumnDef::new(Clearances::StartDate).date().not_null())
            .col(ColumnDef::new(Clearances::EndDate).date().not_null())
            .col(ColumnDef::new(Clearances::Observation).text())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-clearances-provider_id")
                    .from(Clearances::Table, Clearances::ProviderId)
                    .to(Providers::Table, Shared::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager
            .create_table(audited(&mut clearances).to_owned())
            .await?;

        // Attachment metadata, never updated in place
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Files::Name).string().not_null())
                    .col(ColumnDef::new(Files::Extension).string())
                    .col(ColumnDef::new(Files::Size).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Files::StoragePath).string().not_null())
                    .col(ColumnDef::new(Shared::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Shared::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Consultations: every reference is required and must outlive them
        let mut consultations = Table::create();
        consultations
            .table(Consultations::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Consultations::InternalId).string().not_null())
            .col(
                ColumnDef::new(Consultations::ConsultationYear)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(Consultations::Reference).string().not_null())
            .col(ColumnDef::new(Shared::DesignationAr).text())
            .col(ColumnDef::new(Shared::DesignationEn).text())
            .col(ColumnDef::new(Shared::DesignationFr).text().not_null())
            .col(ColumnDef::new(Consultations::AllocatedAmount).double())
            .col(ColumnDef::new(Consultations::FinancialEstimation).double())
            .col(ColumnDef::new(Consultations::StartDate).timestamp())
            .col(ColumnDef::new(Consultations::ApprovalDate).timestamp())
            .col(ColumnDef::new(Consultations::PublishDate).timestamp())
            .col(ColumnDef::new(Consultations::Deadline).timestamp())
            .col(ColumnDef::new(Consultations::ApprovalReference).string())
            .col(ColumnDef::new(Consultations::Observation).text());

        for (column, target, name) in [
            (
                Consultations::AwardMethodId,
                AwardMethods::Table.into_iden(),
                "fk-consultations-award_method_id",
            ),
            (
                Consultations::RealizationNatureId,
                RealizationNatures::Table.into_iden(),
                "fk-consultations-realization_nature_id",
            ),
            (
                Consultations::BudgetTypeId,
                BudgetTypes::Table.into_iden(),
                "fk-consultations-budget_type_id",
            ),
            (
                Consultations::RealizationStatusId,
                RealizationStatuses::Table.into_iden(),
                "fk-consultations-realization_status_id",
            ),
            (
                Consultations::ApprovalStatusId,
                ApprovalStatuses::Table.into_iden(),
                "fk-consultations-approval_status_id",
            ),
            (
                Consultations::RealizationDirectorId,
                RealizationDirectors::Table.into_iden(),
                "fk-consultations-realization_director_id",
            ),
            (
                Consultations::ConsultationStepId,
                ConsultationSteps::Table.into_iden(),
                "fk-consultations-consultation_step_id",
            ),
        ] {
            consultations
                .col(ColumnDef::new(column.clone()).uuid().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name(name)
                        .from(Consultations::Table, column)
                        .to(target, Shared::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
        }
        manager
            .create_table(audited(&mut consultations).to_owned())
            .await?;

        // Submissions die with their consultation and lose deleted files
        let mut submissions = Table::create();
        submissions
            .table(Submissions::Table)
            .if_not_exists()
            .col(ColumnDef::new(Shared::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Submissions::ConsultationId).uuid().not_null())
            .col(ColumnDef::new(Submissions::TenderId).uuid().not_null())
            .col(
                ColumnDef::new(Submissions::SubmissionDate)
                    .timestamp()
                    .not_null(),
            )
            .col(ColumnDef::new(Submissions::FinancialOffer).double())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-submissions-consultation_id")
                    .from(Submissions::Table, Submissions::ConsultationId)
                    .to(Consultations::Table, Shared::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-submissions-tender_id")
                    .from(Submissions::Table, Submissions::TenderId)
                    .to(Providers::Table, Shared::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        for (column, name) in [
            (
                Submissions::AdministrativeFileId,
                "fk-submissions-administrative_file_id",
            ),
            (
                Submissions::TechnicalFileId,
                "fk-submissions-technical_file_id",
            ),
            (
                Submissions::FinancialFileId,
                "fk-submissions-financial_file_id",
            ),
        ] {
            submissions
                .col(ColumnDef::new(column.clone()).uuid())
                .foreign_key(
                    ForeignKey::create()
                        .name(name)
                        .from(Submissions::Table, column)
                        .to(Files::Table, Shared::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                );
        }
        manager
            .create_table(audited(&mut submissions).to_owned())
            .await?;

        // Natural keys
        for index in [
            unique_designation("uq-approval_statuses-designation_fr", ApprovalStatuses::Table),
            unique_designation("uq-realization_statuses-designation_fr", RealizationStatuses::Table),
            unique_designation("uq-realization_natures-designation_fr", RealizationNatures::Table),
            unique_designation("uq-realization_directors-designation_fr", RealizationDirectors::Table),
            unique_designation("uq-budget_types-designation_fr", BudgetTypes::Table),
            unique_designation("uq-exclusion_types-designation_fr", ExclusionTypes::Table),
            unique_designation("uq-consultation_phases-designation_fr", ConsultationPhases::Table),
            unique_designation("uq-consultation_steps-designation_fr", ConsultationSteps::Table),
            unique_designation("uq-award_methods-designation_fr", AwardMethods::Table),
        ] {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("uq-award_methods-acronym_fr")
                    .table(AwardMethods::Table)
                    .col(AwardMethods::AcronymFr)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-consultations-internal_id-year")
                    .table(Consultations::Table)
                    .col(Consultations::InternalId)
                    .col(Consultations::ConsultationYear)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One bid per provider and consultation
        manager
            .create_index(
                Index::create()
                    .name("uq-submissions-consultation_id-tender_id")
                    .table(Submissions::Table)
                    .col(Submissions::ConsultationId)
                    .col(Submissions::TenderId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-providers-company_name")
                    .table(Providers::Table)
                    .col(Providers::CompanyName)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // NULL tax ids do not collide
        manager
            .create_index(
                Index::create()
                    .name("uq-providers-tax_id")
                    .table(Providers::Table)
                    .col(Providers::TaxId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dependents first
        let tables = [
            Submissions::Table.into_iden(),
            Consultations::Table.into_iden(),
            Files::Table.into_iden(),
            Clearances::Table.into_iden(),
            ProviderRepresentators::Table.into_iden(),
            Providers::Table.into_iden(),
            ConsultationSteps::Table.into_iden(),
            AwardMethods::Table.into_iden(),
            ConsultationPhases::Table.into_iden(),
            ExclusionTypes::Table.into_iden(),
            BudgetTypes::Table.into_iden(),
            RealizationDirectors::Table.into_iden(),
            RealizationNatures::Table.into_iden(),
            RealizationStatuses::Table.into_iden(),
            ApprovalStatuses::Table.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum ApprovalStatuses {
    Table,
}

#[derive(Iden)]
enum RealizationStatuses {
    Table,
}

#[derive(Iden)]
enum RealizationNatures {
    Table,
}

#[derive(Iden)]
enum RealizationDirectors {
    Table,
}

#[derive(Iden)]
enum BudgetTypes {
    Table,
}

#[derive(Iden)]
enum ExclusionTypes {
    Table,
}

#[derive(Iden)]
enum ConsultationPhases {
    Table,
}

#[derive(Iden)]
enum ConsultationSteps {
    Table,
    PhaseId,
}

#[derive(Iden)]
enum AwardMethods {
    Table,
    AcronymAr,
    AcronymEn,
    AcronymFr,
}

#[derive(Iden)]
enum Providers {
    Table,
    CompanyName,
    TaxId,
    TradeRegister,
    Address,
    Phone,
    Email,
}

#[derive(Iden)]
enum ProviderRepresentators {
    Table,
    ProviderId,
    LastName,
    FirstName,
    Function,
    Phone,
    Email,
}

#[derive(Iden)]
enum Clearances {
    Table,
    ProviderId,
    Reference,
    StartDate,
    EndDate,
    Observation,
}

#[derive(Iden)]
enum Files {
    Table,
    Name,
    Extension,
    Size,
    StoragePath,
}

#[derive(Iden, Clone)]
enum Consultations {
    Table,
    InternalId,
    ConsultationYear,
    Reference,
    AllocatedAmount,
    FinancialEstimation,
    StartDate,
    ApprovalDate,
    PublishDate,
    Deadline,
    ApprovalReference,
    Observation,
    AwardMethodId,
    RealizationNatureId,
    BudgetTypeId,
    RealizationStatusId,
    ApprovalStatusId,
    RealizationDirectorId,
    ConsultationStepId,
}

#[derive(Iden, Clone)]
enum Submissions {
    Table,
    ConsultationId,
    TenderId,
    SubmissionDate,
    FinancialOffer,
    AdministrativeFileId,
    TechnicalFileId,
    FinancialFileId,
}
