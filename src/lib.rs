pub mod assemble;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod tag;

pub fn get_version() -> String {
    "0.1.0".to_string()
}
