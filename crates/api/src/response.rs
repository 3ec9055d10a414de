//! Shared response types for API handlers.

use magicstream_core::types::DbId;
use serde::Serialize;

/// Write-result returned by the create endpoints (`/addmovie`, `/register`).
#[derive(Debug, Serialize)]
pub struct InsertResult {
    pub inserted_id: DbId,
}
