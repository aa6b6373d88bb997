mod dashboard;
mod employee;
mod feedback;
mod user;

pub use dashboard::{Dashboard, SkillCount};
pub use employee::{Employee, EmployeeFields, EmployeeForm, EmployeeId};
pub use feedback::{Feedback, FeedbackFields, FeedbackForm, FeedbackId, Period, Rating};
pub use user::{CreateUser, User, UserId};
