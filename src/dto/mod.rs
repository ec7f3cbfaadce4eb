pub mod csv_dto;
pub mod merge_dto;
pub mod sync_dto;
