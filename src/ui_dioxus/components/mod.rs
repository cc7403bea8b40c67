pub mod date_navigator;
pub mod rollover_notice;
pub mod subtask_checklist;


pub use date_navigator::DateNavigator;
pub use rollover_notice::RolloverNotice;
pub use subtask_checklist::SubtaskChecklist;
