pub mod add;
pub mod list;
pub mod remove;
pub mod review;
pub mod stats;
pub mod transfer;
