// Infrastructure layer module
// Contains the database adapter, the unit of work, and repository
// implementations

pub mod db;
pub mod repositories;
pub mod unit_of_work;
