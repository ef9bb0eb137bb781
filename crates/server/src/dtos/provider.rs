use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::{file, provider, provider_representator},
    services::{
        clearance::{ClearanceInput, ClearanceView},
        file::FileInput,
        provider::ProviderInput,
        provider_representator::RepresentatorInput,
    },
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub trade_register: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<ProviderRequest> for ProviderInput {
    fn from(request: ProviderRequest) -> Self {
        Self {
            company_name: request.company_name,
            tax_id: request.tax_id,
            trade_register: request.trade_register,
            address: request.address,
            phone: request.phone,
            email: request.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub id: Uuid,
    pub company_name: String,
    pub tax_id: Option<String>,
    pub trade_register: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<provider::Model> for ProviderResponse {
    fn from(model: provider::Model) -> Self {
        Self {
            id: model.id,
            company_name: model.company_name,
            tax_id: model.tax_id,
            trade_register: model.trade_register,
            address: model.address,
            phone: model.phone,
            email: model.email,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepresentatorRequest {
    pub provider_id: Option<Uuid>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub function: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<RepresentatorRequest> for RepresentatorInput {
    fn from(request: RepresentatorRequest) -> Self {
        Self {
            provider_id: request.provider_id,
            last_name: request.last_name,
            first_name: request.first_name,
            function: request.function,
            phone: request.phone,
            email: request.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepresentatorResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub function: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<provider_representator::Model> for RepresentatorResponse {
    fn from(model: provider_representator::Model) -> Self {
        Self {
            id: model.id,
            provider_id: model.provider_id,
            last_name: model.last_name,
            first_name: model.first_name,
            function: model.function,
            phone: model.phone,
            email: model.email,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceRequest {
    pub provider_id: Option<Uuid>,
    pub reference: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub observation: Option<String>,
}

impl From<ClearanceRequest> for ClearanceInput {
    fn from(request: ClearanceRequest) -> Self {
        Self {
            provider_id: request.provider_id,
            reference: request.reference,
            start_date: request.start_date,
            end_date: request.end_date,
            observation: request.observation,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub observation: Option<String>,
    /// NOT_YET_VALID, VALID or EXPIRED as of today
    pub status: String,
    /// Days left including today; zero unless valid
    pub days_remaining: i64,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<ClearanceView> for ClearanceResponse {
    fn from(ClearanceView { clearance, validity }: ClearanceView) -> Self {
        Self {
            id: clearance.id,
            provider_id: clearance.provider_id,
            reference: clearance.reference,
            start_date: clearance.start_date,
            end_date: clearance.end_date,
            observation: clearance.observation,
            status: validity.status.to_string(),
            days_remaining: validity.days_remaining,
            created_by: clearance.created_by,
            created_at: clearance.created_at,
            updated_by: clearance.updated_by,
            updated_at: clearance.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub name: Option<String>,
    /// Taken from the name when omitted
    pub extension: Option<String>,
    pub size: Option<i64>,
    pub storage_path: Option<String>,
}

impl From<FileRequest> for FileInput {
    fn from(request: FileRequest) -> Self {
        Self {
            name: request.name,
            extension: request.extension,
            size: request.size,
            storage_path: request.storage_path,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub extension: Option<String>,
    pub size: i64,
    pub storage_path: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl From<file::Model> for FileResponse {
    fn from(model: file::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            extension: model.extension,
            size: model.size,
            storage_path: model.storage_path,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
