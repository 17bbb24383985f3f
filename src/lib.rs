pub mod aggregate;
pub mod cli;
pub mod ctx;
pub mod dedup;
pub mod io;
pub mod math;
pub mod model;
pub mod patterns;
pub mod pipeline;
pub mod recommend;
pub mod scenario;
pub mod schema;
pub mod scores;
pub mod validate;
