pub mod gate;
pub mod sessions;
