pub mod actor;
pub mod award_method;
pub mod clearance;
pub mod consultation;
pub mod director;
pub mod exclusion;
pub mod phase;
pub mod statistics;
pub mod text;
