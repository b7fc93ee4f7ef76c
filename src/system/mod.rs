pub mod command;
pub mod group;
pub mod kill;
pub mod platform;
pub mod process;
pub mod snapshot;
