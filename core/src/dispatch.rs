// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::canonical::from_xml;
use crate::{
    CertificateStore, ClientCertificate, Context, Endpoint, Environment, Error, ParameterMap,
    ProvideCredential, Result, Route, SignRequest, SignedEnvelope, SigningCredential,
    SigningRequest,
};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use log::debug;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Timeout applied when neither the call nor the client sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher is the main struct used to sign, send and validate requests.
///
/// A dispatcher is safe to share between tasks. The only state it mutates is
/// the cached credential, which is refreshed when it's no longer valid.
#[derive(Clone, Debug)]
pub struct Dispatcher<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    signer: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,

    endpoint: Endpoint,
    environment: Environment,
    certificates: Option<CertificateStore>,
    debug: bool,
    timeout: Duration,
}

impl<K: SigningCredential> Dispatcher<K> {
    /// Create a new dispatcher talking to production.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        signer: impl SignRequest<Credential = K>,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            signer: Arc::new(signer),
            credential: Arc::new(Mutex::new(None)),

            endpoint,
            environment: Environment::Production,
            certificates: None,
            debug: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the client certificate store.
    pub fn with_certificates(mut self, certificates: CertificateStore) -> Self {
        self.certificates = Some(certificates);
        self
    }

    /// Log request and response bodies of this client.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the timeout used by calls that don't carry their own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Get the environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Get the endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Load the credential, reusing the cached one while it's valid.
    pub async fn credential(&self) -> Result<K> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|c| c.is_valid()) {
            return Ok(cred);
        }

        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential available"))?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }

    /// Sign, send and validate a request.
    ///
    /// Nothing reaches the network unless every required parameter is present,
    /// the base URL resolves and the client certificate is available when asked.
    pub async fn send(&self, cx: &CallContext, mut req: SigningRequest) -> Result<Response> {
        req.params.require_non_empty(&req.options.required)?;
        let base_url = self
            .endpoint
            .resolve(self.environment, req.options.route)?
            .to_string();
        let certificate = if req.options.require_cert {
            let store = self.certificates.as_ref().ok_or_else(|| {
                Error::certificate(format!("{} requires a client certificate", req.path))
            })?;
            Some(ClientCertificate(store.bundle()))
        } else {
            None
        };
        cx.check()?;
        req.environment = match req.options.route {
            Route::Production => Environment::Production,
            Route::Client => self.environment,
        };

        let cred = cx.run(self.timeout, self.credential()).await?;
        self.signer
            .sign_request(&self.ctx, &mut req, &cred)
            .await?;

        debug!("sending {} {}{}", req.method, base_url, req.path_and_query());
        if self.debug {
            debug!(
                "request body: {}",
                String::from_utf8_lossy(req.body.as_deref().unwrap_or_default())
            );
        }

        let mut http_req = req.into_http(&base_url)?;
        if let Some(cert) = certificate {
            http_req.extensions_mut().insert(cert);
        }
        let resp = cx.run(self.timeout, self.ctx.http_send(http_req)).await?;

        let status = resp.status();
        debug!("received response with status {status}");
        if self.debug {
            debug!("response body: {}", String::from_utf8_lossy(resp.body()));
        }

        if !status.is_success() {
            return Err(Error::transport(status, resp.into_body()));
        }
        if looks_like_html(resp.body()) {
            return Err(Error::upstream("service answered with an html page")
                .with_status(status)
                .with_body(resp.into_body()));
        }

        let verified_envelope = match self.signer.verify_response(&cred, &resp) {
            None => None,
            Some(v) if v.valid => Some(v.envelope),
            Some(_) => {
                return Err(Error::response_signature("response signature mismatch")
                    .with_status(status)
                    .with_body(resp.into_body()))
            }
        };

        let (parts, body) = resp.into_parts();
        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
            verified_envelope,
        })
    }
}

/// Check if the body is an error page instead of a payload.
///
/// Any `<html` tag in the body counts, whatever precedes it.
fn looks_like_html(body: &[u8]) -> bool {
    const TAG: &[u8] = b"<html";
    body.windows(TAG.len()).any(|w| w.eq_ignore_ascii_case(TAG))
}

/// Response is a validated response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status.
    pub status: StatusCode,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Raw payload.
    pub body: Bytes,
    /// Envelope whose signature was checked, `None` if the response isn't signed.
    pub verified_envelope: Option<SignedEnvelope>,
}

impl Response {
    /// Decode the JSON payload.
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::unmarshal(format!("failed to decode json response: {e}"), self.body.clone())
                .with_source(e)
        })
    }

    /// Decode the XML payload.
    pub fn decode_xml<T: DeserializeOwned>(&self) -> Result<T> {
        let text = self.text()?;
        quick_xml::de::from_str(text).map_err(|e| {
            Error::unmarshal(format!("failed to decode xml response: {e}"), self.body.clone())
                .with_source(e)
        })
    }

    /// Decode a flat `<xml>` payload into parameters.
    pub fn params(&self) -> Result<ParameterMap> {
        from_xml(self.text()?).map_err(|e| {
            Error::unmarshal(format!("failed to decode xml response: {e}"), self.body.clone())
        })
    }

    /// Payload as text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| {
            Error::unmarshal("response is not valid utf-8", self.body.clone()).with_source(e)
        })
    }
}

/// CallContext carries the deadline and cancellation of one call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancelled: Option<watch::Receiver<bool>>,
}

/// Canceller cancels the calls sharing its [`CallContext`].
#[derive(Debug)]
pub struct Canceller {
    tx: watch::Sender<bool>,
}

impl Canceller {
    /// Cancel every in-flight and future call of the paired context.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CallContext {
    /// Create a context that uses the client's timeout and can't be cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that can be cancelled through the returned handle.
    pub fn cancellable() -> (Self, Canceller) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                timeout: None,
                cancelled: Some(rx),
            },
            Canceller { tx },
        )
    }

    /// Set the timeout of this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check if the call has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::cancelled("call cancelled before dispatch"));
        }
        Ok(())
    }

    /// Run `fut` until it completes, the call is cancelled or the deadline passes.
    pub async fn run<T>(
        &self,
        default_timeout: Duration,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let timeout = self.timeout.unwrap_or(default_timeout);
        let mut cancelled = self.cancelled.clone();
        let wait_cancel = async move {
            if let Some(rx) = cancelled.as_mut() {
                loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    // Sender dropped without cancelling.
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
            }
            std::future::pending::<()>().await
        };

        tokio::select! {
            _ = wait_cancel => Err(Error::cancelled("call cancelled")),
            res = tokio::time::timeout(timeout, fut) => match res {
                Ok(v) => v,
                Err(_) => Err(Error::cancelled(format!("call exceeded its deadline of {timeout:?}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{sign_string, to_xml};
    use crate::{
        ErrorKind, HttpSend, SignAlgorithm, SignatureMeta, SigningKey, Verification,
        VerifyingKey,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CLIENT_CERT: &str = include_str!("../testdata/client_cert.pem");
    const CLIENT_KEY: &str = include_str!("../testdata/client_key.pem");

    #[derive(Debug, Clone)]
    struct TestCredential {
        mch_id: String,
        secret: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.secret.is_empty()
        }
    }

    #[derive(Debug, Default)]
    struct TestProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for TestProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TestCredential {
                mch_id: "1900000109".to_string(),
                secret: "K".to_string(),
            }))
        }
    }

    #[derive(Debug)]
    struct XmlSigner;

    #[async_trait]
    impl SignRequest for XmlSigner {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut SigningRequest,
            cred: &Self::Credential,
        ) -> Result<()> {
            if req.options.auto_inject_identity && req.params.is_empty_value("mch_id") {
                req.params.set("mch_id", &cred.mch_id);
            }
            let algorithm = req.algorithm.unwrap_or(SignAlgorithm::Md5);
            let canonical = sign_string(&req.params);
            let signature =
                algorithm.sign(canonical.as_bytes(), &SigningKey::secret(&cred.secret))?;
            req.params.set("sign", signature.clone());
            req.body = Some(to_xml(&req.params)?.into());
            req.envelope = Some(SignedEnvelope {
                canonical,
                signature,
                meta: SignatureMeta::new(algorithm),
            });
            Ok(())
        }

        fn verify_response(
            &self,
            cred: &Self::Credential,
            resp: &http::Response<Bytes>,
        ) -> Option<Verification> {
            let params = from_xml(std::str::from_utf8(resp.body()).ok()?).ok()?;
            let signature = params.get_string("sign");
            if signature.is_empty() {
                return None;
            }
            let canonical = sign_string(&params);
            let valid = SignAlgorithm::Md5.verify(
                canonical.as_bytes(),
                &signature,
                &VerifyingKey::Secret(cred.secret.clone()),
            );
            Some(Verification {
                envelope: SignedEnvelope {
                    canonical,
                    signature,
                    meta: SignatureMeta::new(SignAlgorithm::Md5),
                },
                valid,
            })
        }
    }

    #[derive(Debug, Clone)]
    struct Captured {
        uri: String,
        body: Bytes,
        cert: Option<String>,
    }

    #[derive(Debug, Clone)]
    struct MockHttpSend {
        status: StatusCode,
        body: Bytes,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
        last: Arc<Mutex<Option<Captured>>>,
    }

    impl MockHttpSend {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body: Bytes::from_static(body.as_bytes()),
                delay: None,
                calls: Arc::default(),
                last: Arc::default(),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last(&self) -> Captured {
            self.last.lock().unwrap().clone().expect("a request was sent")
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(Captured {
                uri: req.uri().to_string(),
                body: req.body().clone(),
                cert: req
                    .extensions()
                    .get::<ClientCertificate>()
                    .map(|c| c.0.fingerprint().to_string()),
            });
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(http::Response::builder()
                .status(self.status)
                .body(self.body.clone())?)
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("https://api.mch.weixin.qq.com/")
            .with_sandbox("https://api.mch.weixin.qq.com/sandboxnew/")
    }

    fn dispatcher(http: &MockHttpSend) -> Dispatcher<TestCredential> {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_http_send(http.clone());
        Dispatcher::new(ctx, TestProvider::default(), XmlSigner, endpoint()).with_debug(true)
    }

    fn bill_request() -> SigningRequest {
        SigningRequest::post("pay/downloadbill")
            .with_params(
                ParameterMap::new()
                    .with("bill_date", "2016-04-05")
                    .with("bill_type", "trade"),
            )
            .require(&["bill_date", "bill_type"])
            .without_identity()
    }

    #[tokio::test]
    async fn test_missing_field_makes_no_network_call() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");
        let d = dispatcher(&http);

        let req = SigningRequest::post("pay/downloadbill")
            .with_params(ParameterMap::new().with("bill_date", "2016-04-05"))
            .require(&["bill_date", "bill_type"]);
        let err = d.send(&CallContext::new(), req).await.expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.message().contains("bill_type"));
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_signed_body_matches_known_vector() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, "<xml><return_code>SUCCESS</return_code></xml>");
        let d = dispatcher(&http);

        let resp = d.send(&CallContext::new(), bill_request()).await?;
        assert!(resp.verified_envelope.is_none());

        let sent = http.last();
        assert_eq!(sent.uri, "https://api.mch.weixin.qq.com/pay/downloadbill");
        assert_eq!(
            sent.body,
            "<xml><bill_date>2016-04-05</bill_date><bill_type>trade</bill_type>\
             <sign>C1386CF3A0EAA15528E87B10A50BCAAD</sign></xml>"
        );
        assert_eq!(resp.params()?.get_string("return_code"), "SUCCESS");
        Ok(())
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let http = MockHttpSend::new(StatusCode::SERVICE_UNAVAILABLE, "busy");
        let err = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.body().map(|b| b.as_ref()), Some(&b"busy"[..]));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_html_page_with_ok_status_is_upstream_error() {
        let http = MockHttpSend::new(
            StatusCode::OK,
            "\n<!DOCTYPE html><html><body>System busy</body></html>",
        );
        let err = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err
            .body()
            .map(|b| String::from_utf8_lossy(b).contains("System busy"))
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn test_html_page_after_xml_prolog_is_upstream_error() {
        let http = MockHttpSend::new(
            StatusCode::OK,
            "<?xml version=\"1.0\"?>\n<HTML><body>502 Bad Gateway</body></HTML>",
        );
        let err = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_payload_linking_html_file_is_not_upstream_error() -> Result<()> {
        let http = MockHttpSend::new(
            StatusCode::OK,
            "<xml><return_msg>see help.html</return_msg></xml>",
        );
        dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_routing() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");

        let d = dispatcher(&http).with_environment(Environment::Sandbox);
        d.send(&CallContext::new(), bill_request()).await?;
        assert_eq!(
            http.last().uri,
            "https://api.mch.weixin.qq.com/sandboxnew/pay/downloadbill"
        );

        d.send(
            &CallContext::new(),
            bill_request().with_route(Route::Production),
        )
        .await?;
        assert_eq!(http.last().uri, "https://api.mch.weixin.qq.com/pay/downloadbill");

        let ctx = Context::new().with_http_send(http.clone());
        let d = Dispatcher::new(
            ctx,
            TestProvider::default(),
            XmlSigner,
            endpoint().with_base_url_override("http://127.0.0.1:9000/"),
        )
        .with_environment(Environment::Sandbox);
        d.send(&CallContext::new(), bill_request()).await?;
        assert_eq!(http.last().uri, "http://127.0.0.1:9000/pay/downloadbill");
        Ok(())
    }

    #[tokio::test]
    async fn test_sandbox_without_host_is_config_error() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");
        let ctx = Context::new().with_http_send(http.clone());
        let d = Dispatcher::new(
            ctx,
            TestProvider::default(),
            XmlSigner,
            Endpoint::new("https://api.mch.weixin.qq.com"),
        )
        .with_environment(Environment::Sandbox);

        let err = d
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_response_signature() -> Result<()> {
        // sign = MD5("return_code=SUCCESS&key=K")
        let valid = format!(
            "<xml><return_code>SUCCESS</return_code><sign>{}</sign></xml>",
            SignAlgorithm::Md5.sign(b"return_code=SUCCESS", &SigningKey::secret("K"))?
        );
        let http = MockHttpSend::new(StatusCode::OK, Box::leak(valid.into_boxed_str()));
        let resp = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await?;
        let envelope = resp.verified_envelope.expect("response is signed");
        assert_eq!(envelope.canonical, "return_code=SUCCESS");

        let http = MockHttpSend::new(
            StatusCode::OK,
            "<xml><return_code>SUCCESS</return_code><sign>0000</sign></xml>",
        );
        let err = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ResponseSignature);
        assert!(err
            .body()
            .map(|b| String::from_utf8_lossy(b).contains("SUCCESS"))
            .unwrap_or(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_client_certificate() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");

        let err = dispatcher(&http)
            .send(&CallContext::new(), bill_request().with_cert())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Certificate);
        assert_eq!(http.calls(), 0);

        let store = CertificateStore::load(CLIENT_CERT, CLIENT_KEY, None)?;
        let fingerprint = store.bundle().fingerprint().to_string();
        let d = dispatcher(&http).with_certificates(store);

        d.send(&CallContext::new(), bill_request()).await?;
        assert_eq!(http.last().cert, None);

        d.send(&CallContext::new(), bill_request().with_cert())
            .await?;
        assert_eq!(http.last().cert, Some(fingerprint));
        Ok(())
    }

    #[tokio::test]
    async fn test_deadline_is_cancelled() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>")
            .with_delay(Duration::from_secs(5));
        let cx = CallContext::new().with_timeout(Duration::from_millis(20));

        let err = dispatcher(&http)
            .send(&cx, bill_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_client_timeout_applies_without_call_timeout() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>")
            .with_delay(Duration::from_secs(5));

        let err = dispatcher(&http)
            .with_timeout(Duration::from_millis(20))
            .send(&CallContext::new(), bill_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_in_flight() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>")
            .with_delay(Duration::from_secs(5));
        let d = dispatcher(&http);
        let (cx, canceller) = CallContext::cancellable();

        let handle = tokio::spawn(async move { d.send(&cx, bill_request()).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();

        let err = handle
            .await
            .expect("task must not panic")
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_before_dispatch() {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");
        let (cx, canceller) = CallContext::cancellable();
        canceller.cancel();

        let err = dispatcher(&http)
            .send(&cx, bill_request())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_credential_is_cached() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, "<xml></xml>");
        let provider = TestProvider::default();
        let calls = provider.calls.clone();
        let ctx = Context::new().with_http_send(http.clone());
        let d = Dispatcher::new(ctx, provider, XmlSigner, endpoint());

        d.send(&CallContext::new(), bill_request()).await?;
        d.send(&CallContext::new(), bill_request()).await?;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(http.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_raw_bytes() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, "<xml><a>1</a></xml>");
        let resp = dispatcher(&http)
            .send(&CallContext::new(), bill_request())
            .await?;

        let err = resp
            .decode_json::<serde_json::Value>()
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Unmarshal);
        assert_eq!(err.body(), Some(&resp.body));
        Ok(())
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html(b"<html><body/></html>"));
        assert!(looks_like_html(b"  <!doctype HTML><HTML>"));
        assert!(looks_like_html(b"<?xml version=\"1.0\"?>\n<html><body>502</body></html>"));
        assert!(looks_like_html("\u{feff}<html></html>".as_bytes()));
        assert!(looks_like_html(b"System error\n<html>x</html>"));
        assert!(looks_like_html(b"<head></head><html>x</html>"));
        assert!(looks_like_html(b"{\"msg\":\"<html>\"}"));
        assert!(!looks_like_html(b"<xml><return_msg>see help.html</return_msg></xml>"));
        assert!(!looks_like_html(b""));
    }
}
