mod executor;
pub use executor::*;

mod module;
pub use module::*;

mod options;
pub use options::*;

pub(crate) mod prompt;

mod react_agent;
pub use react_agent::*;

mod reviewer;
pub use reviewer::*;

mod toolable;
pub use toolable::*;

#[cfg(test)]
pub(crate) mod test_support;
