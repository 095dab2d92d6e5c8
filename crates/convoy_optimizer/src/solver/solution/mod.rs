pub mod activity;
pub mod planned_trip;
pub mod planning;
pub mod route;
pub(crate) mod utils;
