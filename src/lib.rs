pub mod configuration;
pub mod domain;
pub mod format;
pub mod render;
pub mod run_script;
pub mod script;
pub mod store;
pub mod view_model;
pub mod wallet;
