//! # Database State
//!
//! Wraps the `Database` connection for use in commands. The pool inside
//! `shelf_db::Database` is already shareable, so no extra locking happens here.

use shelf_db::Database;

#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
