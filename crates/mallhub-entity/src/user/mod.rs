//! User account entities.

pub mod model;
pub mod status;

pub use model::{NewUser, User, UserView};
pub use status::UserStatus;
