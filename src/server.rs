use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, Result};
use crate::logger::log_request;
use crate::provider::ProviderRegistry;
use crate::resource::Resource;
use crate::utils::{accept_header, content_type_header, normalize_path};

/// Routes requests to [`Resource`]s, encodes their output with the provider
/// negotiated from `Accept`, then applies the resource's cache directives.
pub struct ApiServer {
    addr: SocketAddr,
    resources: Vec<Arc<dyn Resource>>,
    registry: Arc<ProviderRegistry>,
}

impl ApiServer {
    pub fn new(addr: SocketAddr, registry: Arc<ProviderRegistry>) -> Self {
        info!("Creating API server on {}", addr);
        Self {
            addr,
            resources: Vec::new(),
            registry,
        }
    }

    pub fn add_resource(&mut self, resource: Arc<dyn Resource>) {
        info!("Adding resource: {}", resource.name());
        self.resources.push(resource);
    }

    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    #[tracing::instrument(skip(self, shutdown))]
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting API server on {}", self.addr);
        debug!("Registered resources: {}", self.resources.len());
        debug!("Providers: {:?}", self.registry);

        let resources = Arc::new(self.resources.clone());
        let registry = self.registry.clone();

        let make_svc = make_service_fn(move |conn: &AddrStream| {
            let remote_addr = conn.remote_addr();
            debug!("New connection from: {}", remote_addr);

            let resources = resources.clone();
            let registry = registry.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    debug!(
                        "Received request from {}: {} {}",
                        remote_addr,
                        req.method(),
                        req.uri()
                    );
                    Self::handle_request(req, resources.clone(), registry.clone())
                }))
            }
        });

        let server = Server::try_bind(&self.addr)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .serve(make_svc)
            .with_graceful_shutdown(shutdown);
        info!("API server is ready to accept connections");

        if let Err(e) = server.await {
            error!("Server error: {}", e);
            return Err(ApiError::Network(e.to_string()));
        }

        info!("API server stopped");
        Ok(())
    }

    pub async fn handle_request(
        req: Request<Body>,
        resources: Arc<Vec<Arc<dyn Resource>>>,
        registry: Arc<ProviderRegistry>,
    ) -> std::result::Result<Response<Body>, Infallible> {
        let started = Instant::now();
        let path = normalize_path(req.uri().path()).to_string();

        let response = match resources.iter().find(|r| r.can_handle(&path)) {
            Some(resource) => {
                debug!("Resource {} will process {}", resource.name(), path);
                match Self::dispatch(req, resource.as_ref(), &registry).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("Resource {} failed: {}", resource.name(), e);
                        error_response(&e)
                    }
                }
            }
            None => {
                warn!("No resource found for request: {}", path);
                text_response(StatusCode::NOT_FOUND, "No resource found for this request")
            }
        };

        log_request(&path, response.status(), started.elapsed());
        Ok(response)
    }

    async fn dispatch(
        req: Request<Body>,
        resource: &dyn Resource,
        registry: &ProviderRegistry,
    ) -> Result<Response<Body>> {
        let encoder = registry.negotiate(accept_header(&req))?;
        debug!("Negotiated provider: {}", encoder.name());

        let is_get = *req.method() == Method::GET;
        let value = match req.method().clone() {
            Method::GET => resource.get().await?,
            Method::POST => {
                let content_type = content_type_header(&req)
                    .ok_or_else(|| ApiError::UnsupportedMediaType("missing Content-Type".into()))?
                    .to_string();
                let decoder = registry
                    .map_provider(&content_type)
                    .map_err(|e| match e {
                        ApiError::NoProvider(ct) => ApiError::UnsupportedMediaType(ct),
                        other => other,
                    })?;
                let body = hyper::body::to_bytes(req.into_body())
                    .await
                    .map_err(|e| ApiError::Network(e.to_string()))?;
                resource.post(decoder.decode(&body)?).await?
            }
            other => return Err(ApiError::MethodNotAllowed(other.to_string())),
        };

        let content_type = HeaderValue::from_str(&encoder.content_type().to_string())
            .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
        let mut response = Response::new(Body::from(encoder.encode(&value)?));
        response.headers_mut().insert(CONTENT_TYPE, content_type);

        if is_get {
            if let Some(cache) = resource.cache_config() {
                cache.apply(&mut response)?;
            }
        }

        Ok(response)
    }
}

fn text_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    let mut response = Response::new(Body::from(message.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

fn error_response(err: &ApiError) -> Response<Body> {
    text_response(err.status_code(), err.to_string())
}
