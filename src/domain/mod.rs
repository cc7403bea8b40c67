pub mod calendar;
pub mod category;
pub mod day_view;
pub mod task;
pub mod user;
