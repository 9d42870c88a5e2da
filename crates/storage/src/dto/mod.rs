pub mod fighter;
pub mod gym;
pub mod match_event;
pub mod trainer;
