pub mod aggregator;
pub mod calendar_grid;
