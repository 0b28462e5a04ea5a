pub mod distance;
pub mod intensity;
