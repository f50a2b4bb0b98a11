//! # Blog Core
//!
//! The domain layer of the blog backend: themes, posts and users, their
//! validation rules, the repository ports infrastructure has to provide, and
//! the stores that tie them together.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{PostService, ThemeService, UserInput, UserService};
