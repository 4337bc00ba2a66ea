pub mod dashboard_commands;
pub mod file_commands;
