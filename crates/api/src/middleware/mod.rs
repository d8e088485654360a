pub mod ownership;
pub mod session;
