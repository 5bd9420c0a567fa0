//! Persistence boundary. Handlers and services only see the traits, so the
//! engine can run against in-memory stores in tests.

pub mod attendance_repository;
pub mod employee_repository;

pub use attendance_repository::{AttendanceRepository, AttendanceRepositoryTrait};
pub use employee_repository::{EmployeeRepository, EmployeeRepositoryTrait};
