pub mod connection;
pub mod leagues;
pub mod mappings;
pub mod models;
pub mod profiles;
pub mod results;
pub mod sessions;
pub mod setup;
pub mod standings;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
