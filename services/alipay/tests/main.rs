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

use log::warn;
use paysign_alipay::{Client, Config};
use paysign_core::{CallContext, Context, OsEnv, ParameterMap, Result};
use paysign_file_read_tokio::TokioFileRead;
use paysign_http_send_reqwest::ReqwestHttpSend;
use std::env;

fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("PAYSIGN_ALIPAY_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default()
        .from_env(&ctx)
        .expect("alipay config must be valid");
    Some(Client::from_config(ctx, config))
}

#[tokio::test]
async fn test_data_bill_download_url_query() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("PAYSIGN_ALIPAY_TEST is not set, skipped");
        return Ok(());
    };

    let resp = client
        .data_bill_download_url_query(
            &CallContext::new(),
            ParameterMap::new()
                .with("bill_type", "trade")
                .with("bill_date", "2016-04-05"),
        )
        .await?;
    assert!(!resp.response.code.is_empty());
    Ok(())
}
