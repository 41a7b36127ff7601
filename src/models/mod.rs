pub mod demographics;
pub mod match_result;
pub mod records;
pub mod stats_models;
