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

use crate::constants::*;
use crate::models::{Order, Patch};
use crate::{AccessTokenProvider, Config, Credential, RequestSigner};
use http::{Method, StatusCode};
use paysign_core::{
    CallContext, Context, Dispatcher, Endpoint, Error, ParameterMap, Result, Route,
    SigningRequest,
};
use percent_encoding::utf8_percent_encode;

/// Endpoint of the PayPal REST API.
pub fn endpoint() -> Endpoint {
    Endpoint::new(PRODUCTION_HOST).with_sandbox(SANDBOX_HOST)
}

/// Client of the PayPal REST API.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher<Credential>,
}

impl Client {
    /// Create a client over a prepared dispatcher.
    pub fn new(dispatcher: Dispatcher<Credential>) -> Self {
        Self { dispatcher }
    }

    /// Create a client from config.
    ///
    /// Both `client_id` and `secret` are required. The access token is requested
    /// on the first call from the host of the configured environment.
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let (Some(client_id), Some(secret)) = (&config.client_id, &config.secret) else {
            return Err(Error::config_invalid(format!(
                "{PAYPAL_CLIENT_ID} and {PAYPAL_SECRET} are required"
            )));
        };

        let mut endpoint = endpoint();
        if let Some(base_url) = &config.base_url {
            endpoint = endpoint.with_base_url_override(base_url);
        }
        let environment = config.environment.unwrap_or_default();
        let token_url = endpoint
            .resolve(environment, Route::Client)?
            .to_string();
        let loader = AccessTokenProvider::new(client_id, secret).with_base_url(&token_url);

        let mut dispatcher = Dispatcher::new(ctx, loader, RequestSigner::new(), endpoint)
            .with_environment(environment)
            .with_debug(config.debug.unwrap_or_default());
        if let Some(timeout) = config.timeout {
            dispatcher = dispatcher.with_timeout(timeout);
        }
        Ok(Self::new(dispatcher))
    }

    /// Get the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<Credential> {
        &self.dispatcher
    }

    /// Create an order.
    ///
    /// - [API reference](https://developer.paypal.com/docs/api/orders/v2/#orders_create)
    pub async fn create_order(&self, cx: &CallContext, params: ParameterMap) -> Result<Order> {
        let req = SigningRequest::post(CHECKOUT_ORDERS)
            .with_params(params)
            .require(&["intent", "purchase_units"]);
        self.dispatcher.send(cx, req).await?.decode_json()
    }

    /// Show details of an order, `query` may carry options like `fields`.
    ///
    /// - [API reference](https://developer.paypal.com/docs/api/orders/v2/#orders_get)
    pub async fn order_detail(
        &self,
        cx: &CallContext,
        order_id: &str,
        query: ParameterMap,
    ) -> Result<Order> {
        let req = SigningRequest::get(order_path(order_id)?).with_params(query);
        self.dispatcher.send(cx, req).await?.decode_json()
    }

    /// Update an order with JSON patch operations.
    ///
    /// - [API reference](https://developer.paypal.com/docs/api/orders/v2/#orders_patch)
    pub async fn update_order(
        &self,
        cx: &CallContext,
        order_id: &str,
        patches: &[Patch],
    ) -> Result<()> {
        if patches.is_empty() {
            return Err(Error::missing_field("patches"));
        }
        let req = SigningRequest::new(Method::PATCH, order_path(order_id)?)
            .with_body(serde_json::to_vec(patches)?);

        let resp = self.dispatcher.send(cx, req).await?;
        if resp.status != StatusCode::NO_CONTENT {
            return Err(Error::unexpected("update order expects 204 no content")
                .with_status(resp.status)
                .with_body(resp.body));
        }
        Ok(())
    }
}

fn order_path(order_id: &str) -> Result<String> {
    if order_id.is_empty() {
        return Err(Error::missing_field("order_id"));
    }
    Ok(format!(
        "{CHECKOUT_ORDERS}/{}",
        utf8_percent_encode(order_id, &PATH_SEGMENT_SET)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorResponse;
    use crate::StaticCredentialProvider;
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::header::AUTHORIZATION;
    use http::HeaderMap;
    use paysign_core::{Environment, ErrorKind, HttpSend};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const ORDER: &str = r#"{"id":"5O190127TN364715T","status":"CREATED","links":[{"href":"https://api-m.paypal.com/v2/checkout/orders/5O190127TN364715T","rel":"self","method":"GET"},{"href":"https://www.paypal.com/checkoutnow?token=5O190127TN364715T","rel":"approve","method":"GET"}]}"#;

    #[derive(Debug, Clone)]
    struct Captured {
        method: Method,
        uri: String,
        headers: HeaderMap,
        body: Bytes,
    }

    /// Answers token requests with a fresh token and everything else with `body`.
    #[derive(Debug, Clone)]
    struct MockHttpSend {
        status: StatusCode,
        body: &'static str,
        calls: Arc<AtomicUsize>,
        token_calls: Arc<AtomicUsize>,
        last: Arc<Mutex<Option<Captured>>>,
    }

    impl MockHttpSend {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                calls: Arc::default(),
                token_calls: Arc::default(),
                last: Arc::default(),
            }
        }

        fn last(&self) -> Captured {
            self.last
                .lock()
                .unwrap()
                .clone()
                .expect("a request must have been sent")
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            if req.uri().path() == ACCESS_TOKEN {
                self.token_calls.fetch_add(1, Ordering::SeqCst);
                return Ok(http::Response::new(Bytes::from_static(
                    br#"{"access_token":"A21AAFEpH4PsADK7qSS7pSRsgzfENtu","token_type":"Bearer","expires_in":32400}"#,
                )));
            }

            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(Captured {
                method: req.method().clone(),
                uri: req.uri().to_string(),
                headers: req.headers().clone(),
                body: req.body().clone(),
            });
            Ok(http::Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))?)
        }
    }

    fn client(http: &MockHttpSend) -> Client {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_http_send(http.clone());
        Client::new(Dispatcher::new(
            ctx,
            StaticCredentialProvider::new("A21AAF"),
            RequestSigner::new(),
            endpoint(),
        ))
    }

    #[tokio::test]
    async fn test_create_order() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::CREATED, ORDER);
        let order = client(&http)
            .create_order(
                &CallContext::new(),
                ParameterMap::new().with("intent", "CAPTURE").with(
                    "purchase_units",
                    vec![ParameterMap::new().with(
                        "amount",
                        ParameterMap::new()
                            .with("currency_code", "USD")
                            .with("value", "100.00"),
                    )],
                ),
            )
            .await?;

        assert_eq!(order.id, "5O190127TN364715T");
        assert_eq!(
            order.link("approve").map(|l| l.href.as_str()),
            Some("https://www.paypal.com/checkoutnow?token=5O190127TN364715T")
        );

        let req = http.last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.uri, "https://api-m.paypal.com/v2/checkout/orders");
        assert_eq!(req.headers[AUTHORIZATION], "Bearer A21AAF");
        assert_eq!(
            req.body.as_ref(),
            br#"{"intent":"CAPTURE","purchase_units":[{"amount":{"currency_code":"USD","value":"100.00"}}]}"#
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_missing_field() {
        let http = MockHttpSend::new(StatusCode::CREATED, ORDER);
        let err = client(&http)
            .create_order(&CallContext::new(), ParameterMap::new().with("intent", "CAPTURE"))
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.message().contains("purchase_units"));
        assert_eq!(http.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_order_detail() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, ORDER);
        let order = client(&http)
            .order_detail(
                &CallContext::new(),
                "5O190127TN364715T",
                ParameterMap::new().with("fields", "payment_source"),
            )
            .await?;
        assert_eq!(order.status.as_deref(), Some("CREATED"));

        let req = http.last();
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.uri,
            "https://api-m.paypal.com/v2/checkout/orders/5O190127TN364715T?fields=payment_source"
        );
        assert!(req.body.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_order_detail_not_found() {
        let http = MockHttpSend::new(
            StatusCode::NOT_FOUND,
            r#"{"name":"RESOURCE_NOT_FOUND","details":[{"issue":"INVALID_RESOURCE_ID"}],"message":"The specified resource does not exist.","debug_id":"a7c8a4fcbb5d6"}"#,
        );
        let err = client(&http)
            .order_detail(&CallContext::new(), "UNKNOWN", ParameterMap::new())
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        let detail = ErrorResponse::from_error(&err).expect("must decode");
        assert_eq!(detail.name, "RESOURCE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_order() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::NO_CONTENT, "");
        let patches = [Patch::replace("/intent", serde_json::json!("AUTHORIZE"))];
        client(&http)
            .update_order(&CallContext::new(), "5O190127TN364715T", &patches)
            .await?;

        let req = http.last();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(
            req.body.as_ref(),
            br#"[{"op":"replace","path":"/intent","value":"AUTHORIZE"}]"#
        );

        let err = client(&http)
            .update_order(&CallContext::new(), "", &patches)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::MissingField);

        let err = client(&http)
            .update_order(&CallContext::new(), "5O190127TN364715T", &[])
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_unexpected_status() {
        let http = MockHttpSend::new(StatusCode::OK, ORDER);
        let patches = [Patch::replace("/intent", serde_json::json!("AUTHORIZE"))];
        let err = client(&http)
            .update_order(&CallContext::new(), "5O190127TN364715T", &patches)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_from_config_fetches_token_once() -> Result<()> {
        let http = MockHttpSend::new(StatusCode::OK, ORDER);
        let ctx = Context::new().with_http_send(http.clone());
        let client = Client::from_config(
            ctx,
            Config {
                client_id: Some("client".to_string()),
                secret: Some("secret".to_string()),
                environment: Some(Environment::Sandbox),
                ..Default::default()
            },
        )?;

        for _ in 0..2 {
            client
                .order_detail(&CallContext::new(), "5O190127TN364715T", ParameterMap::new())
                .await?;
        }
        assert_eq!(http.token_calls.load(Ordering::SeqCst), 1);

        let req = http.last();
        assert_eq!(
            req.uri,
            "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T"
        );
        assert_eq!(
            req.headers[AUTHORIZATION],
            "Bearer A21AAFEpH4PsADK7qSS7pSRsgzfENtu"
        );
        Ok(())
    }

    #[test]
    fn test_from_config_requires_secret() {
        let err = Client::from_config(
            Context::new(),
            Config {
                client_id: Some("client".to_string()),
                ..Default::default()
            },
        )
        .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
