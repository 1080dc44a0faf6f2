pub mod dao;
pub mod entity;
pub mod errors;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod service;
pub mod sort;
pub mod validation;

pub use errors::ApiError;
pub use models::{Template, TemplateCreate, TemplateUpdate};
pub use service::TemplateService;
