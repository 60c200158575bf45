//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod cutting_order_repo;
pub mod dashboard_repo;
pub mod fabric_repo;
pub mod garment_repo;
pub mod order_line_repo;
pub mod session_repo;
pub mod trash_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use cutting_order_repo::CuttingOrderRepo;
pub use dashboard_repo::DashboardRepo;
pub use fabric_repo::FabricRepo;
pub use garment_repo::GarmentRepo;
pub use order_line_repo::OrderLineRepo;
pub use session_repo::SessionRepo;
pub use trash_repo::TrashRepo;
pub use user_repo::UserRepo;
