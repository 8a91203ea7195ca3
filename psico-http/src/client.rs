//! Authenticated, tenant-aware request client.
//!
//! One [`ApiClient`] is built per host and shared (it is cheap to clone).
//! Every request goes through the same two interception points:
//!
//! - outgoing: `Authorization: Token <credential>` when a credential is
//!   stored, and `X-Tenant-Schema` with the selected tenant or the tenant
//!   resolved from the hostname (omitted when there is neither)
//! - incoming: a 401 clears the stored credential and role and emits a single
//!   [`SessionEvent::Expired`]; every other failure is returned untouched as
//!   a [`PsicoError`]

use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use psico_core::errors::{ErrorKind, PsicoError, PsicoResult};
use psico_core::{Session, SessionEvent, SessionEvents, TenantContext, TenantResolver};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;

pub const TENANT_HEADER: &str = "X-Tenant-Schema";
pub const TOKEN_SCHEME: &str = "Token";

/// Empty query string for downloads that take no parameters.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// A binary download (documents, backups, reports).
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    hostname: String,
    resolver: TenantResolver,
    session: Session,
    events: SessionEvents,
    configured_tenant: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("hostname", &self.inner.hostname)
            .finish()
    }
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    resolver: TenantResolver,
    session: Session,
    events: SessionEvents,
}

impl ApiClientBuilder {
    pub fn resolver(mut self, resolver: TenantResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn events(mut self, events: SessionEvents) -> Self {
        self.events = events;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .cookie_store(true)
            .default_headers(default_headers)
            .build()?;

        let base_url = self
            .config
            .base_url
            .build_for_host(&self.config.hostname, &self.resolver)
            .trim_end_matches('/')
            .to_string();
        if let Err(e) = url::Url::parse(&base_url) {
            return Err(PsicoError::general_error(format!("invalid API base URL `{base_url}`: {e}")).into_anyhow());
        }

        tracing::debug!(base_url = %base_url, host = %self.config.hostname, "api client configured");

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                hostname: self.config.hostname,
                resolver: self.resolver,
                session: self.session,
                events: self.events,
                configured_tenant: self.config.selected_tenant,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            resolver: TenantResolver::default(),
            session: Session::default(),
            events: SessionEvents::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn hostname(&self) -> &str {
        &self.inner.hostname
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.inner.resolver
    }

    /// Tenant the next request will be scoped to. Re-derived on every call:
    /// the stored selection, then the configured tenant, then the host.
    pub fn tenant_context(&self) -> TenantContext {
        let selected = self
            .inner
            .session
            .selected_tenant()
            .or_else(|| self.inner.configured_tenant.clone());
        TenantContext::effective(
            selected.as_deref(),
            self.inner.resolver.resolve(&self.inner.hostname),
        )
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        }
    }

    /// Headers the outgoing interceptor adds right now.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.inner.session.token() {
            match HeaderValue::from_str(&format!("{TOKEN_SCHEME} {token}")) {
                Ok(mut v) => {
                    v.set_sensitive(true);
                    headers.insert(AUTHORIZATION, v);
                }
                Err(_) => tracing::warn!("stored credential is not a valid header value; sending without it"),
            }
        }

        let ctx = self.tenant_context();
        if let Some(tenant) = ctx.tenant_str() {
            match HeaderValue::from_str(tenant) {
                Ok(v) => {
                    headers.insert(TENANT_HEADER, v);
                }
                Err(_) => tracing::warn!(tenant = %tenant, "tenant is not a valid header value"),
            }
        }

        tracing::debug!(
            authorized = headers.contains_key(AUTHORIZATION),
            tenant = ?ctx.tenant_str(),
            source = ?ctx.source,
            "outgoing request headers"
        );
        headers
    }

    /// Start a request with the interceptor headers applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, self.url(path))
            .headers(self.auth_headers())
    }

    /// Start a request with neither credential nor tenant header. Used for
    /// the global administrator login against the central backend.
    pub fn public_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.http.request(method, self.url(path))
    }

    /// Send without the incoming interceptor: a 401 is returned like any
    /// other failure and the session is left alone.
    pub async fn send_public(&self, req: RequestBuilder) -> PsicoResult<Response> {
        let resp = req.send().await.map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await.into_anyhow());
        }
        Ok(resp)
    }

    /// Send and apply the incoming interceptor.
    pub async fn send(&self, req: RequestBuilder) -> PsicoResult<Response> {
        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.session_expired(resp).await.into_anyhow());
        }
        if !status.is_success() {
            return Err(error_from_response(resp).await.into_anyhow());
        }
        Ok(resp)
    }

    async fn session_expired(&self, resp: Response) -> PsicoError {
        let err = error_from_response(resp).await;
        tracing::warn!(message = %err.message, "credential rejected, clearing session");
        if let Err(e) = self.inner.session.clear_credentials() {
            tracing::warn!(error = %e, "could not clear stored credential");
        }
        self.inner.events.emit(&SessionEvent::expired());
        err
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PsicoResult<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        read_json(resp).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> PsicoResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::GET, path).query(query)).await?;
        read_json(resp).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> PsicoResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::POST, path).json(body)).await?;
        read_json(resp).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> PsicoResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::PUT, path).json(body)).await?;
        read_json(resp).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> PsicoResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::PATCH, path).json(body)).await?;
        read_json(resp).await
    }

    pub async fn delete(&self, path: &str) -> PsicoResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// GET where 404 means "not there yet" rather than an error.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> PsicoResult<Option<T>> {
        match self.get::<T>(path).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if PsicoError::from_anyhow(&e).is_some_and(|pe| pe.kind == ErrorKind::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_bytes<Q>(&self, path: &str, query: &Q) -> PsicoResult<Download>
    where
        Q: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::GET, path).query(query)).await?;
        read_download(resp).await
    }

    pub async fn post_bytes<B>(&self, path: &str, body: &B) -> PsicoResult<Download>
    where
        B: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::POST, path).json(body)).await?;
        read_download(resp).await
    }

    /// Multipart upload. The JSON content type default is replaced by the
    /// multipart boundary header.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> PsicoResult<T> {
        let req = self.inner.http.post(self.url(path)).headers(self.auth_headers()).multipart(form);
        let resp = self.send(req).await?;
        read_json(resp).await
    }
}

fn transport_error(e: reqwest::Error) -> anyhow::Error {
    let kind = if e.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Network
    };
    let message = if e.is_timeout() {
        "the server did not answer in time".to_string()
    } else {
        "network error or the server is not responding".to_string()
    };
    tracing::warn!(error = %e, ?kind, "request failed before a response");
    PsicoError::new(kind, message).with_source(e.into()).into_anyhow()
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> PsicoResult<T> {
    let bytes = resp.bytes().await.map_err(transport_error)?;
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };
    serde_json::from_slice(body).map_err(|e| {
        PsicoError::general_error(format!("unexpected response body: {e}"))
            .with_source(e.into())
            .into_anyhow()
    })
}

async fn read_download(resp: Response) -> PsicoResult<Download> {
    let headers = resp.headers();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let filename = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_disposition);
    let bytes = resp.bytes().await.map_err(transport_error)?;
    Ok(Download {
        bytes,
        content_type,
        filename,
    })
}

/// `attachment; filename="report.pdf"` → `report.pdf`
pub fn filename_from_disposition(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let (key, v) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = v.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Build a `PsicoError` from a non-2xx response.
pub async fn error_from_response(resp: Response) -> PsicoError {
    let status = resp.status();
    let body: Option<Value> = resp.bytes().await.ok().and_then(|b| serde_json::from_slice(&b).ok());
    error_from_parts(status.as_u16(), body.as_ref())
}

/// Message comes from `detail`, then `non_field_errors[0]`, then `error` /
/// `message`, then the status reason. 400/422 object bodies are kept as
/// field errors.
pub fn error_from_parts(status: u16, body: Option<&Value>) -> PsicoError {
    let kind = ErrorKind::from_status(status);

    let message = body
        .and_then(|b| {
            b.get("detail")
                .and_then(Value::as_str)
                .or_else(|| b.get("non_field_errors").and_then(|v| v.get(0)).and_then(Value::as_str))
                .or_else(|| b.get("error").and_then(Value::as_str))
                .or_else(|| b.get("message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        });

    let mut err = PsicoError::new(kind, message);
    if matches!(kind, ErrorKind::BadRequest | ErrorKind::Unprocessable) {
        if let Some(Value::Object(map)) = body {
            let mut fields = map.clone();
            fields.remove("detail");
            if !fields.is_empty() {
                err = err.with_errors(Value::Object(fields));
            }
        }
    }
    if kind.is_server() {
        tracing::warn!(status, message = %err.message, "backend error");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_messages_follow_backend_conventions() {
        let e = error_from_parts(400, Some(&json!({"non_field_errors": ["Credenciales incorrectas."]})));
        assert_eq!(e.message, "Credenciales incorrectas.");
        assert_eq!(e.kind, ErrorKind::BadRequest);

        let e = error_from_parts(403, Some(&json!({"detail": "No permitido"})));
        assert_eq!(e.message, "No permitido");
        assert!(e.errors.is_none());

        let e = error_from_parts(500, None);
        assert_eq!(e.message, "Internal Server Error");
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let config = ClientConfig::for_host("localhost").with_override("not a url");
        let err = ApiClient::builder(config).build().unwrap_err();
        assert_eq!(PsicoError::from_anyhow(&err).map(|e| e.kind), Some(ErrorKind::GeneralError));
    }

    #[test]
    fn validation_bodies_keep_field_errors() {
        let e = error_from_parts(400, Some(&json!({"detail": "x", "email": ["required"]})));
        assert!(e.is_validation());
        assert_eq!(e.field_errors(), vec![("email".to_string(), vec!["required".to_string()])]);
    }

    #[test]
    fn disposition_filenames() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"backup_2024.sql\"").as_deref(),
            Some("backup_2024.sql")
        );
        assert_eq!(filename_from_disposition("inline").as_deref(), None);
    }
}
