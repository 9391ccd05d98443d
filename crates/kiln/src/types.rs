//! Data types nested inside tasks.

mod arg;
mod fileset;
mod resource;

pub use arg::Arg;
pub use fileset::{Exclude, FileSet, Include};
pub use resource::Resource;
