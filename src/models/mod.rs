// Model module exports

pub mod busy;
pub mod event;
pub mod suggestion;
pub mod task;
