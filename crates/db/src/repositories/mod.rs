//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod case_repo;
pub mod equipment_repo;
pub mod reference_repo;
pub mod warranty_work_repo;

pub use case_repo::CaseRepo;
pub use equipment_repo::EquipmentRepo;
pub use reference_repo::ReferenceRepo;
pub use warranty_work_repo::WarrantyWorkRepo;
