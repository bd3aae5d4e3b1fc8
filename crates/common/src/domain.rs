mod device;
mod page;
mod result;

pub use device::*;
pub use page::*;
pub use result::*;
