//! Shop module: three-layer architecture (domain, repository, service).
//!
//! Tracked products, folders and the product/folder association.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod product_service;
pub mod folder_service;

pub use folder_service::FolderService;
pub use product_service::ProductService;
