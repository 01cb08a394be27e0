pub mod agent;
pub mod llm;
pub mod schemas;
pub mod tools;

pub(crate) mod utils;
