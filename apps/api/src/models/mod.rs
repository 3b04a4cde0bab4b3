pub mod course;
pub mod role;
pub mod skill;
