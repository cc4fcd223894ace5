pub mod descriptor;
pub mod download_coordinator;
pub mod error;
pub mod queues;
pub mod result;
