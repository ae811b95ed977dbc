pub mod checklist_repo;
pub mod evaluation_repo;
pub mod schedule_repo;
pub mod user_repo;

pub use checklist_repo::ChecklistRepo;
pub use evaluation_repo::EvaluationRepo;
pub use schedule_repo::ScheduleRepo;
pub use user_repo::UserRepo;
