use crate::error::Result;

/// A single presence check backed by one external query.
///
/// `Ok(false)` means the query ran and saw nothing; `Err(_)` means the query
/// itself could not complete. Callers treat both as "not detected".
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn detect(&self) -> Result<bool>;
}
