pub mod analysis;
pub mod enums;
pub mod region;
pub mod samples;

pub use analysis::*;
pub use enums::*;
pub use region::*;
pub use samples::*;
