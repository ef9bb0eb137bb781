//! Fixtures for service tests: a migrated in-memory SQLite database and
//! helpers that seed the rows a consultation needs.

use chrono::Duration;
use migration::{Migrator, MigratorTrait};
use models::actor::Actor;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use crate::{
    entities::provider,
    services::{
        award_method::{AwardMethodInput, AwardMethodService},
        common::now,
        consultation::ConsultationInput,
        consultation_step::{ConsultationStepInput, ConsultationStepService},
        provider::{ProviderInput, ProviderService},
        reference::{
            ApprovalStatusService, BudgetTypeService, ConsultationPhaseService, DesignationInput,
            RealizationDirectorService, RealizationNatureService, RealizationStatusService,
        },
    },
};

pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn actor() -> Actor {
    Actor::new("tester")
}

/// Ids of one row in each table a consultation references
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub phase_id: Uuid,
    pub award_method_id: Uuid,
    pub realization_nature_id: Uuid,
    pub budget_type_id: Uuid,
    pub realization_status_id: Uuid,
    pub approval_status_id: Uuid,
    pub realization_director_id: Uuid,
    pub consultation_step_id: Uuid,
}

pub async fn seed(db: &DatabaseConnection) -> Seed {
    let actor = actor();
    let phase = ConsultationPhaseService::create(db, &actor, DesignationInput::fr("Préparation"))
        .await
        .unwrap();
    let step = ConsultationStepService::create(
        db,
        &actor,
        ConsultationStepInput {
            phase_id: Some(phase.id),
            designation_fr: Some("Rédaction du cahier des charges".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let award_method = AwardMethodService::create(
        db,
        &actor,
        AwardMethodInput {
            designation_fr: Some("Appel d'offres ouvert".into()),
            acronym_fr: Some("AOO".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    Seed {
        phase_id: phase.id,
        award_method_id: award_method.id,
        realization_nature_id: RealizationNatureService::create(db, &actor, DesignationInput::fr("Travaux"))
            .await
            .unwrap()
            .id,
        budget_type_id: BudgetTypeService::create(db, &actor, DesignationInput::fr("Fonctionnement"))
            .await
            .unwrap()
            .id,
        realization_status_id: RealizationStatusService::create(db, &actor, DesignationInput::fr("En cours"))
            .await
            .unwrap()
            .id,
        approval_status_id: ApprovalStatusService::create(db, &actor, DesignationInput::fr("Approuvé"))
            .await
            .unwrap()
            .id,
        realization_director_id: RealizationDirectorService::create(
            db,
            &actor,
            DesignationInput::fr("Directeur général"),
        )
        .await
        .unwrap()
        .id,
        consultation_step_id: step.step.id,
    }
}

/// A complete consultation input that closes `deadline_in` from now
pub fn consultation_input(
    seed: &Seed,
    internal_id: &str,
    year: &str,
    deadline_in: Duration,
) -> ConsultationInput {
    let now = now();
    ConsultationInput {
        internal_id: Some(internal_id.into()),
        consultation_year: Some(year.into()),
        designation_fr: Some(format!("Consultation {internal_id}")),
        allocated_amount: Some(500_000.0),
        financial_estimation: Some(450_000.0),
        publish_date: Some(now - Duration::days(1)),
        deadline: Some(now + deadline_in),
        award_method_id: Some(seed.award_method_id),
        realization_nature_id: Some(seed.realization_nature_id),
        budget_type_id: Some(seed.budget_type_id),
        realization_status_id: Some(seed.realization_status_id),
        approval_status_id: Some(seed.approval_status_id),
        realization_director_id: Some(seed.realization_director_id),
        consultation_step_id: Some(seed.consultation_step_id),
        ..Default::default()
    }
}

pub async fn seed_provider(db: &DatabaseConnection, company_name: &str) -> provider::Model {
    ProviderService::create(
        db,
        &actor(),
        ProviderInput {
            company_name: Some(company_name.into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}
