pub mod daily_record_repository;
pub mod fixed_cost_repository;
pub mod profile_repository;

pub use daily_record_repository::DailyRecordRepository;
pub use fixed_cost_repository::FixedCostRepository;
pub use profile_repository::ProfileRepository;
