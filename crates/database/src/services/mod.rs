pub mod award_method;
pub mod clearance;
pub mod common;
pub mod consultation;
pub mod consultation_step;
pub mod file;
pub mod provider;
pub mod provider_representator;
pub mod reference;
pub mod submission;
