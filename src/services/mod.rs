// Service module exports

pub mod remote;
pub mod schedule;
