mod address;
mod alignment;
mod layout_utils;

pub use address::*;
pub use alignment::*;
pub use core::alloc::Layout;
pub use layout_utils::*;
