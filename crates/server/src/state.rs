use sea_orm::DatabaseConnection;

/// Shared by every handler; the connection is a pool handle and cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
