//! Admin area: the session guard and the users/logs views
//!
//! Views are plain state holders driven through an `AdminApi`. User
//! mutations are applied locally first and settled once the remote call
//! returns.

pub mod guard;
pub mod logs;
pub mod users;

pub use guard::{guard, navigate};
pub use logs::LogsView;
pub use users::{DataSource, MutationId, Outcome, UsersView};
