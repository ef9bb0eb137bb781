pub mod approval_status;
pub mod award_method;
pub mod budget_type;
pub mod clearance;
pub mod consultation;
pub mod consultation_phase;
pub mod consultation_step;
pub mod exclusion_type;
pub mod file;
pub mod provider;
pub mod provider_representator;
pub mod realization_director;
pub mod realization_nature;
pub mod realization_status;
pub mod submission;
