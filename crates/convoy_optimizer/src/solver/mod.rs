pub mod algorithm;
pub mod criterion;
pub mod crosser;
pub mod insertion;
pub mod score;
pub mod solution;
pub mod solver_error;
pub mod solver_params;
pub mod statistics;
