//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chapter_repo;
pub mod favorite_repo;
pub mod fiction_repo;
pub mod genre_repo;
pub mod user_repo;

pub use chapter_repo::ChapterRepo;
pub use favorite_repo::FavoriteRepo;
pub use fiction_repo::FictionRepo;
pub use genre_repo::GenreRepo;
pub use user_repo::UserRepo;
