//! Configuration of the files discovery reads

pub mod layout;

pub use layout::FileLayout;
