pub mod api;
pub mod soap;
