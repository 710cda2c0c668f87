pub mod attendance;
pub mod backup;
pub mod core;
pub mod dashboard;
pub mod documents;
pub mod payments;
pub mod permits;
pub mod profile;
pub mod reports;
pub mod slots;
pub mod students;
pub mod visits;
