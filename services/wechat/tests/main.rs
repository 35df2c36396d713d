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
use paysign_core::utils::nonce;
use paysign_core::{CallContext, Context, OsEnv, ParameterMap, Result};
use paysign_file_read_tokio::TokioFileRead;
use paysign_http_send_reqwest::ReqwestHttpSend;
use paysign_wechat::{Client, Config};
use std::env;

async fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("PAYSIGN_WECHAT_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default()
        .from_env(&ctx)
        .expect("wechat pay config must be valid");
    Some(
        Client::from_config(ctx, config)
            .await
            .expect("wechat pay client must be created"),
    )
}

#[tokio::test]
async fn test_download_bill() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("PAYSIGN_WECHAT_TEST is not set, skipped");
        return Ok(());
    };

    let bill = client
        .download_bill(
            &CallContext::new(),
            ParameterMap::new()
                .with("nonce_str", nonce(32))
                .with("bill_date", "20160405")
                .with("bill_type", "ALL"),
        )
        .await?;
    assert!(!bill.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reverse() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("PAYSIGN_WECHAT_TEST is not set, skipped");
        return Ok(());
    };

    let resp = client
        .reverse(
            &CallContext::new(),
            ParameterMap::new()
                .with("nonce_str", nonce(32))
                .with("out_trade_no", "6aDCor1nUcAihrV5JBlI09tLvXbUp02B")
                .with("sign_type", "MD5"),
        )
        .await?;
    assert!(resp.return_code.is_some());
    Ok(())
}
