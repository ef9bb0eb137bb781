use utoipa::OpenApi;

/// API Documentation. Paths are collected from the routers in [`crate::routes`].
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Award methods", description = "Procurement procedures and their category"),
        (name = "Consultation phases", description = "Stages of the tender lifecycle"),
        (name = "Consultation steps", description = "Steps within a phase"),
        (name = "Approval statuses", description = "Approval outcomes of a consultation file"),
        (name = "Realization statuses", description = "Progress of a realization"),
        (name = "Realization natures", description = "Works, supplies, services, ..."),
        (name = "Realization directors", description = "Directorates in charge of a consultation"),
        (name = "Budget types", description = "Budget lines funding a consultation"),
        (name = "Exclusion types", description = "Grounds for excluding a provider"),
        (name = "Consultations", description = "Tenders, their figures and yearly statistics"),
        (name = "Submissions", description = "Bids of providers on consultations"),
        (name = "Providers", description = "Companies that bid on consultations"),
        (name = "Provider representators", description = "Contacts of a provider"),
        (name = "Clearances", description = "Tax and social clearances of providers"),
        (name = "Files", description = "Attachment metadata"),
    ),
    info(
        title = "Tender Registry API",
        version = "1.0.0",
        description = "Procurement consultations, submissions and providers",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
