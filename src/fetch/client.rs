use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for HTTP execution, so dataset and real-time fetches can be faked
/// in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
