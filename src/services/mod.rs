pub mod analysis;
pub mod poller;
pub mod predict;
pub mod queue_predict;
