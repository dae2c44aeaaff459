pub mod grid;
pub mod npy_io;
