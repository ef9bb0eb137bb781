pub mod award_method;
pub mod common;
pub mod consultation;
pub mod provider;
pub mod reference;
pub mod submission;
