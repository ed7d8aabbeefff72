pub mod classify;
pub mod core_api;
pub mod derive;
pub mod profile;
pub mod record;
pub mod sanitize;
pub mod sections;
pub mod tables;
