pub mod controller;
pub mod pipeline;

pub use controller::JobController;
