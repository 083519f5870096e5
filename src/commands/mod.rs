pub mod migrate;
pub mod serve;
pub mod token;

pub use migrate::{handle_check_migrations, handle_migrate};
pub use serve::handle_serve;
pub use token::handle_issue_token;
