use crate::client::AdminClient;
use crate::error::Result;
use crate::paths::index_action_url;
use reqwest::{Method, StatusCode};
use tracing::info;

impl AdminClient {
    /// Force a flush of the configured index on node `idx`
    ///
    /// The acknowledgement body is not parsed. The HTTP status is handed
    /// back as-is, so a rejected flush is visible to the caller without
    /// being an error here.
    pub async fn flush(&self, idx: usize) -> Result<StatusCode> {
        let endpoint = self.config.endpoint(idx)?;
        let url = index_action_url(endpoint, &self.config.index, "_flush")?;

        let response = self.issuer.issue(Method::POST, &url, None).await?;
        let status = response.status();

        if self.config.verbose {
            info!(node = idx, index = %self.config.index, "index flushed: {}", status);
        }
        Ok(status)
    }
}
