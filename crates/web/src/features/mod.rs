pub mod fighters;
pub mod gyms;
pub mod matches;
pub mod trainers;
