//! HTTP routing with matchit.
//!
//! Provides a simple router for registering and dispatching HTTP handlers.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;
use crate::config::SharedConfig;
use crate::response::HttpResponse;
use hyper::Method;

/// Boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Handler context passed to route handlers.
pub struct Context {
    /// The request URI.
    pub uri: hyper::Uri,
    /// The request headers.
    pub headers: hyper::http::HeaderMap,
    /// The request body, pre-read as bytes.
    pub body: Bytes,
    /// Database handle. Optional for modules that don't need a database.
    pub db: Option<crate::db::Handle>,
    /// Server configuration.
    pub config: SharedConfig,
    /// Caller resolved by the auth gate, for procedures that require one.
    pub user_id: Option<String>,
}

impl Context {
    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let value = if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body)
                .map_err(|e| crate::Error::BadRequest(format!("Invalid request body: {e}")))?
        };
        from_value(value)
    }

    /// Parse the request body as JSON or as an urlencoded form, depending on
    /// `Content-Type`. A missing content type is read as JSON.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T> {
        let content_type = self
            .header("Content-Type")
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase());

        match content_type.as_deref() {
            _ if self.body.is_empty() => self.json(),
            None | Some(JSON) => self.json(),
            Some(FORM) => {
                let fields: Map<String, Value> = url::form_urlencoded::parse(&self.body)
                    .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                    .collect();
                from_value(Value::Object(fields))
            }
            Some(_) => Err(crate::Error::UnsupportedMediaType {
                expected: format!("{JSON} or {FORM}"),
            }),
        }
    }

    /// Get a query string value by name. The first occurrence wins.
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Require authenticated user, returning Unauthorized if not present.
    pub fn require_user_id(&self) -> Result<String> {
        match &self.user_id {
            Some(id) => Ok(id.clone()),
            None => crate::auth::extract_user_id(&self.headers, &self.config.auth),
        }
    }

    /// Require database, returning Internal error if not configured.
    pub fn require_db(&self) -> Result<&crate::db::Handle> {
        self.db
            .as_ref()
            .ok_or_else(|| crate::Error::Internal("Database not configured".to_string()))
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| crate::Error::BadRequest(format!("Invalid request body: {e}")))
}

/// Handler function type.
/// Takes a Context and returns a future resolving to a Response.
pub type Handler = Box<dyn Fn(Context) -> BoxFuture<'static, Result<HttpResponse>> + Send + Sync>;

/// A registered route with method-specific handlers.
struct RouteEntry {
    handlers: HashMap<Method, Handler>,
}

/// HTTP router for registering and dispatching requests.
pub struct Router {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
    pub(crate) operations: Vec<crate::operation::Meta>,
}

impl Router {
    /// Create a new router.
    pub fn new() -> Self {
        Self {
            routes: matchit::Router::new(),
            entries: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Register a handler for a method and path.
    pub fn route<F, Fut>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        let entry_idx = match self.routes.at(path) {
            Ok(matched) => *matched.value,
            Err(_) => {
                let idx = self.entries.len();
                self.entries.push(RouteEntry {
                    handlers: HashMap::new(),
                });
                if let Err(e) = self.routes.insert(path, idx) {
                    tracing::warn!("Route {path} not registered: {e}");
                }
                idx
            }
        };

        let boxed: Handler = Box::new(move |ctx| Box::pin(handler(ctx)));
        self.entries[entry_idx].handlers.insert(method, boxed);
    }

    /// Convenience method for GET requests.
    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    /// Register a [`Procedure`](crate::procedure::Procedure), wiring up both
    /// the HTTP handler and OpenAPI metadata in one call.
    ///
    /// Authenticated procedures have the bearer token checked before the
    /// body is read, so a caller without credentials always sees 401.
    pub fn procedure<P: crate::procedure::Procedure>(&mut self) {
        use hyper::StatusCode;

        let meta = P::meta();
        let method = meta.method.clone();
        let path = meta.path;
        let status = meta.status;
        let authenticated = meta.authenticated;

        self.route(method, path, move |mut ctx| async move {
            if authenticated {
                ctx.user_id = Some(crate::auth::extract_user_id(
                    &ctx.headers,
                    &ctx.config.auth,
                )?);
            }
            let input: P::Input = ctx.payload()?;
            let output = P::handle(ctx, input).await?;
            crate::response::json(
                StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
                &output,
            )
        });

        let input_schema = if std::any::TypeId::of::<P::Input>()
            == std::any::TypeId::of::<crate::procedure::Empty>()
        {
            None
        } else {
            Some(schemars::schema_for!(P::Input))
        };

        let output_schema = schemars::schema_for!(P::Output);

        self.operations.push(crate::operation::Meta {
            path: meta.path.to_string(),
            method: meta.method.to_string().to_lowercase(),
            summary: meta.summary.to_string(),
            tag: meta.tag.to_string(),
            status: meta.status,
            authenticated,
            query: meta.query.to_vec(),
            input_schema,
            output_schema,
        });
    }

    /// Register a GET route that serves the OpenAPI JSON document built from
    /// all previously registered procedures.
    pub fn openapi(&mut self, path: &str, info: crate::openapi::Info) {
        let spec = crate::openapi::generate(&info, &self.operations);
        let json = Bytes::from(spec.to_string());
        self.get(path, move |_ctx| {
            let json = json.clone();
            async move { Ok(crate::response::raw_json(hyper::StatusCode::OK, json)) }
        });
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe router handle for use in request handling.
pub struct RouterHandle {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Convert to a thread-safe handle for use in request handling.
    pub fn into_handle(self) -> Arc<RouterHandle> {
        Arc::new(RouterHandle {
            routes: self.routes,
            entries: self.entries,
        })
    }
}

/// Result of matching a request to a route.
pub enum RouteMatch<'a> {
    /// Route matched with handler.
    Matched(&'a Handler),
    /// Path matched but method not allowed.
    MethodNotAllowed,
    /// Path not found.
    NotFound,
}

impl RouterHandle {
    /// Match a request to a route.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        match self.routes.at(path) {
            Ok(matched) => {
                let entry = &self.entries[*matched.value];
                match entry.handlers.get(method) {
                    Some(handler) => RouteMatch::Matched(handler),
                    None => RouteMatch::MethodNotAllowed,
                }
            }
            Err(_) => RouteMatch::NotFound,
        }
    }
}
