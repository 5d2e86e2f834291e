//! [`HttpClient`](super::HttpClient) decorators that attach credentials.

mod url_param;

pub use url_param::UrlParam;
