pub mod redirect;
pub mod robots_settings;
pub mod seo_data;
