use isahc::{AsyncBody, Request, Response, config::Configurable};

use crate::{Error, config::Api};

/// Thin wrapper over `isahc::HttpClient` with the connect timeout and user
/// agent every request shares. Requests are sent once; there is no retry and
/// no overall deadline unless one is configured.
#[derive(Clone)]
pub struct HttpClient {
    inner: isahc::HttpClient,
}

impl HttpClient {
    pub fn new(api: &Api) -> Result<Self, Error> {
        let mut builder = isahc::HttpClient::builder()
            .connect_timeout(api.connect_timeout())
            .default_header(
                "user-agent",
                format!("abuse-report/{}", env!("CARGO_PKG_VERSION")),
            );
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build()?;

        Ok(Self { inner })
    }

    pub async fn send_async<B>(&self, request: Request<B>) -> Result<Response<AsyncBody>, Error>
    where
        B: Into<AsyncBody>,
    {
        debug!("{} {}", request.method(), request.uri());
        self.inner.send_async(request).await.map_err(|err| {
            let err: Error = err.into();
            warn!("http request failed: {}", err);
            err
        })
    }
}
