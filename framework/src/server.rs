use crate::config::ServerConfig;
use crate::error::FrameworkError;
use crate::http::{collect_body, HttpResponse, Request};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP/1 server driving a [`Router`]
pub struct Server {
    router: Arc<Router>,
    config: ServerConfig,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Self::from_config(router, &ServerConfig::builder().host("127.0.0.1").port(8080).build())
    }

    pub fn from_config(router: Router, config: &ServerConfig) -> Self {
        Self {
            router: Arc::new(router),
            config: config.clone(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Largest request body accepted, in bytes; larger bodies get a 413
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr().map_err(|e| {
            FrameworkError::internal(format!("invalid server host '{}': {}", self.config.host, e))
        })?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "Server listening");

        let router = self.router;
        let max_body_size = self.config.max_body_size;

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    async move {
                        Ok::<_, Infallible>(handle_request(&router, max_body_size, req).await)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!(%peer, error = %err, "Error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    router: &Router,
    max_body_size: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let response: HttpResponse = match collect_body(body, max_body_size).await {
        Ok(bytes) => {
            let request = Request::new(parts.method, parts.uri, parts.headers, bytes);
            router.dispatch(request).await
        }
        Err(e) => router.render_error(&e),
    };

    response.into_hyper()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_land_in_config() {
        let server = Server::new(Router::new()).host("0.0.0.0").port(9001).max_body_size(64);

        assert_eq!(server.config().addr().unwrap().to_string(), "0.0.0.0:9001");
        assert_eq!(server.config().max_body_size, 64);
    }
}
