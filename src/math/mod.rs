pub mod reduce_mt;
pub mod stats;
