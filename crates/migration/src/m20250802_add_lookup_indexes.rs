use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Year listings and statistics
        manager
            .create_index(
                Index::create()
                    .name("idx_consultations_year")
                    .table(Consultations::Table)
                    .col(Consultations::ConsultationYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consultations_deadline")
                    .table(Consultations::Table)
                    .col(Consultations::Deadline)
                    .to_owned(),
            )
            .await?;

        // The unique (consultation_id, tender_id) index already covers lookups by consultation
        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_tender_id")
                    .table(Submissions::Table)
                    .col(Submissions::TenderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consultation_steps_phase_id")
                    .table(ConsultationSteps::Table)
                    .col(ConsultationSteps::PhaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_representators_provider_id")
                    .table(ProviderRepresentators::Table)
                    .col(ProviderRepresentators::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clearances_provider_id_end_date")
                    .table(Clearances::Table)
                    .col(Clearances::ProviderId)
                    .col(Clearances::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_clearances_provider_id_end_date", Clearances::Table.into_iden()),
            (
                "idx_provider_representators_provider_id",
                ProviderRepresentators::Table.into_iden(),
            ),
            ("idx_consultation_steps_phase_id", ConsultationSteps::Table.into_iden()),
            ("idx_submissions_tender_id", Submissions::Table.into_iden()),
            ("idx_consultations_deadline", Consultations::Table.into_iden()),
            ("idx_consultations_year", Consultations::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Consultations {
    Table,
    ConsultationYear,
    Deadline,
}

#[derive(Iden)]
enum Submissions {
    Table,
    TenderId,
}

#[derive(Iden)]
enum ConsultationSteps {
    Table,
    PhaseId,
}

#[derive(Iden)]
enum ProviderRepresentators {
    Table,
    ProviderId,
}

#[derive(Iden)]
enum Clearances {
    Table,
    ProviderId,
    EndDate,
}
