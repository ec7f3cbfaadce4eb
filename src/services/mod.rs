pub mod identity_service;
pub mod import_service;
pub mod merge_service;
pub mod token_service;
pub mod transform;
pub mod upsert_service;
