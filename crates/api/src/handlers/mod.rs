pub mod ai;
pub mod auth;
pub mod chapter;
pub mod favorite;
pub mod fiction;
pub mod form;
pub mod genre;
pub mod user;
