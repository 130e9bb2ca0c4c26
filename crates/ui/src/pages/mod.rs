//! Page components for the Playdeck dashboard
//!
//! One component per route; each mounts its own fetchers.

pub mod command;
pub mod configurations;
pub mod dashboard;
pub mod executions;
pub mod not_found;
pub mod schedules;
pub mod servers;
pub mod templates;
pub mod terminal;

pub use command::Command;
pub use configurations::Configurations;
pub use dashboard::Dashboard;
pub use executions::Executions;
pub use not_found::NotFound;
pub use schedules::Schedules;
pub use servers::Servers;
pub use templates::Templates;
pub use terminal::Terminal;
