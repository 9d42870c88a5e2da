pub mod fighter;
pub mod fighter_record;
pub mod fighter_trainer;
pub mod gym;
pub mod match_event;
pub mod participant;
pub mod trainer;

pub use fighter::{FIGHTER_STATUSES, Fighter, WEIGHT_CLASSES};
pub use fighter_record::FighterRecord;
pub use fighter_trainer::TrainerAssignment;
pub use gym::Gym;
pub use match_event::MatchEvent;
pub use participant::{Outcome, Participant};
pub use trainer::Trainer;
