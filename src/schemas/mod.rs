mod ledger;
pub use ledger::*;

mod message;
pub use message::*;

mod step;
pub use step::*;

mod tool_call;
pub use tool_call::*;
