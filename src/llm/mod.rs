mod conversation;
pub use conversation::*;

mod error;
pub use error::*;

mod gateway;
pub use gateway::*;

pub mod openai;
pub use openai::*;
