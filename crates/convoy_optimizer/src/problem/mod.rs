pub mod fleet;
pub mod job;
pub mod location;
pub mod service;
pub mod time_window;
pub mod travel_cost_matrix;
pub mod trip;
pub mod vehicle;
pub mod vehicle_routing_problem;
