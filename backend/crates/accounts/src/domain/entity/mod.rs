pub mod auth_session;
pub mod department;
pub mod profile;
pub mod user;
