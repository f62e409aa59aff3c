//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// User profiles (keyed by user ID)
    pub const USERS: &str = "users";
    pub const ROUTINES: &str = "routines";
    pub const SESSIONS: &str = "sessions";
}
