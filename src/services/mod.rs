pub mod analysis;
pub mod email;
