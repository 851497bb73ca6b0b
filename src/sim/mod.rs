pub mod infiltration;
pub mod network;
