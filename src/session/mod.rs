pub(crate) mod command;
pub(crate) mod engine;
pub(crate) mod loads;
pub(crate) mod views;
