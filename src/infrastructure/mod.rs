pub mod imaging;
pub mod queue;
pub mod storage;
