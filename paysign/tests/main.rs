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

use paysign::{default_context, Environment, Route};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_default_context() -> paysign::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = default_context();
    let dir = std::env::temp_dir().join("paysign-default-context");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("apiclient_key.pem");
    std::fs::write(&path, "key")?;

    let content = ctx
        .file_read_as_string(&path.to_string_lossy())
        .await?;
    assert_eq!(content, "key");
    assert_eq!(ctx.env_vars().len(), std::env::vars().count());
    Ok(())
}

#[test]
fn test_provider_endpoints() -> paysign::Result<()> {
    assert_eq!(
        paysign::wechat::endpoint().resolve(Environment::Sandbox, Route::Client)?,
        "https://api.mch.weixin.qq.com/sandboxnew/"
    );
    assert_eq!(
        paysign::wechat::endpoint().resolve(Environment::Sandbox, Route::Production)?,
        "https://api.mch.weixin.qq.com/"
    );
    assert_eq!(
        paysign::alipay::endpoint().resolve(Environment::Production, Route::Client)?,
        "https://openapi.alipay.com/gateway.do"
    );
    assert_eq!(
        paysign::paypal::endpoint().resolve(Environment::Sandbox, Route::Client)?,
        "https://api-m.sandbox.paypal.com"
    );
    assert!(paysign::wechat::v3::endpoint()
        .resolve(Environment::Sandbox, Route::Client)
        .is_err());
    Ok(())
}
