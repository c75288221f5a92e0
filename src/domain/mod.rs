pub mod commission;
pub mod deal;
pub mod format;
pub mod monthly;
pub mod pipeline;
