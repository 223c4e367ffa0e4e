//! Hardware-facing register backings

pub mod linux;

pub use linux::{CharDeviceBacking, DevMemBacking, page_size};
