use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::providers::base::KeyValidator;
use crate::providers::configs::ProviderConfig;

/// A mock validator that returns pre-configured verdicts for testing
pub struct MockValidator {
    verdicts: Arc<Mutex<Vec<bool>>>,
}

impl MockValidator {
    /// Create a new mock validator with a sequence of verdicts
    pub fn new(verdicts: Vec<bool>) -> Self {
        Self {
            verdicts: Arc::new(Mutex::new(verdicts)),
        }
    }
}

#[async_trait]
impl KeyValidator for MockValidator {
    async fn validate(&self, _config: &ProviderConfig) -> Result<bool> {
        let mut verdicts = self.verdicts.lock().unwrap();
        if verdicts.is_empty() {
            // Accept once the pre-configured verdicts run out
            Ok(true)
        } else {
            Ok(verdicts.remove(0))
        }
    }
}
