mod flag;
mod operation;
mod time;
mod version;

pub use self::{flag::*, operation::*, time::*, version::*};
