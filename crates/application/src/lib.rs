#![forbid(unsafe_code)]

pub mod candidate_pipeline;
