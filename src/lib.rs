pub mod domain;
pub mod infrastructure;
pub mod launch;
pub mod plugin;
pub mod presentation;
pub mod resolver;
