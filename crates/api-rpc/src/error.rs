//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. The message is always the
//! error's display text, ready to show to a user.

use jsonrpsee::types::ErrorObjectOwned;
use matchday_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const FEED_ERROR: i32 = 5002;
    pub const SYNC_FAILED: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Validation(_) | AppError::Domain(_) | AppError::Serialization(_) => {
            code::VALIDATION_ERROR
        }
        AppError::NotFound(_) => code::NOT_FOUND,
        AppError::Database(_) => code::DB_ERROR,
        AppError::Feed(_) => code::FEED_ERROR,
        AppError::SyncFailed(_) => code::SYNC_FAILED,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
