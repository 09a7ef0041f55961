pub mod cli;
pub mod cluster;
pub mod config;
pub mod ctx;
pub mod entity;
pub mod fdr;
pub mod io;
pub mod math;
pub mod parallel;
pub mod pipeline;
pub mod sampler;
pub mod schema;
pub mod signal;
pub mod trial;
