pub mod database_validator;
pub mod redirects;
pub mod robots;
pub mod robots_store;
pub mod seo;
pub mod seo_meta;
pub mod seo_validator;
