use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::MockServer;

use crate::auth::error::{transport_error, SocialError, SocialResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse};

/// Start a fresh `httpmock::MockServer` instance for use in unit tests.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}

/// In-memory [`HttpClient`] answering from a queue of canned responses and
/// recording every request it receives.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<SocialResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, error: SocialError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn request(&self, request: HttpRequest) -> SocialResult<HttpResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(transport_error(format!("no canned response for {url}"))))
    }
}
