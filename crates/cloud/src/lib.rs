//! Clients for the services Fictsu talks to over the network.
//!
//! - [`storage`] -- object storage for covers and chapter images.
//! - [`ai`] -- text and image generation.
//! - [`identity`] -- OAuth2 login with a third-party identity provider.
//!
//! Each service is a trait object so the api crate can hold it in shared
//! state and tests can swap in an in-process fake. Every network call takes
//! an explicit timeout.

pub mod ai;
pub mod identity;
pub mod storage;
