mod application;
mod permissions;

pub use application::TestApp;
pub use permissions::Permissions;
