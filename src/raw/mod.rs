mod arena;
mod binary;
mod handle;
mod multiway;

pub(crate) use binary::{InOrder, RawBinaryTree};
pub(crate) use handle::Handle;
pub(crate) use multiway::{MultiwayInOrder, RawMultiwayTree};
