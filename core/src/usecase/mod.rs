pub mod dashboard;
pub mod day_session;
