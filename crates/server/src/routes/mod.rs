pub mod health;
pub mod redirects;
pub mod robots;
pub mod seo;
