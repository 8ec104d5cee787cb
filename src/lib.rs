pub mod config;
pub mod encoder;
pub mod fingerprint;
pub mod form;
pub mod generate;
pub mod json;
pub mod json_ext;
pub mod projection;
pub mod types;
