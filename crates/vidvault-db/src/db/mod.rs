//! Database repositories for data access layer
//
// Repository trait shared by every backend
pub mod repository;
//
// PostgreSQL implementation (sqlx, dynamic queries)
pub mod video;
//
// Process-local implementation
pub mod memory;

pub use memory::InMemoryVideoRepository;
pub use repository::VideoRepository;
pub use video::PgVideoRepository;
