use async_trait::async_trait;
use reqwest::{Request, Response};

/// Anything that can send a prepared request. Lets credentials be layered
/// on as decorators around a base client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
