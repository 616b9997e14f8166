use http::{header, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub struct TestResponse {
    response: reqwest::Response,
}

#[allow(unused)]
impl TestResponse {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        TestResponse { response }
    }

    pub async fn json<T: DeserializeOwned>(self) -> T {
        self.response
            .json()
            .await
            .expect("failed to deserialize to json")
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION)
    }
}
