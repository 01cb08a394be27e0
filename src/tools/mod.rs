mod capability;
pub use capability::*;

mod error;
pub use error::*;

mod registry;
pub use registry::*;

mod tool;
pub use tool::*;
