//! Homeroom class administration core: one in-process store of students,
//! attendance, permits, payments, home visits and the teacher profile,
//! mirrored to local key/value storage, plus the derived dashboard views.

pub mod backup;
pub mod config;
pub mod ids;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod views;
