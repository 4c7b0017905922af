//! Convenience re-exports for common use.

pub use crate::client::{collect_records, paginate, ApiResponse, OktaClient};
pub use crate::config::{AuthConfig, OktaConfig};
pub use crate::error::{ApiError, ErrorCause, OktaError, Result};
