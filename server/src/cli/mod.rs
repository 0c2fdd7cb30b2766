pub mod database_migration;
pub mod load_data;
pub mod manage_users;
mod util;

/// Capability token for creating admin-level [crate::data_store::authorization::AuthContext]s
/// without a user session.
///
/// It can only be constructed explicitly, so command line functions have to state that they are
/// acting with full privileges.
pub struct CliAuthTokenKey {
    _private: (),
}

impl CliAuthTokenKey {
    #[allow(clippy::new_without_default)] // We always want to explicitly create these objects
    pub fn new() -> Self {
        Self { _private: () }
    }
}
