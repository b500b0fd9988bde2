pub mod provider;
pub mod seed;
pub mod test_app;
