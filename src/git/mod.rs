pub mod command;
pub mod repo;

pub use command::git_command;
pub use repo::GitRepo;
