mod auth;
mod health_check;
mod users;

pub use auth::{login, refresh_token};
pub use health_check::{health_check, index};
pub use users::{create_user, delete_user, list_users, update_user};
