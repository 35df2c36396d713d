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

//! Typed responses of the sub merchant application APIs.

use serde::Deserialize;

/// Response of submitting an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Apply4SubSubmit {
    /// Id assigned to the application.
    pub applyment_id: i64,
}

/// State of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Apply4SubQuery {
    pub business_code: String,
    pub applyment_id: i64,
    /// Only present once the sub merchant is created.
    pub sub_mchid: Option<String>,
    pub sign_url: Option<String>,
    pub applyment_state: String,
    pub applyment_state_msg: String,
    pub audit_detail: Vec<AuditDetail>,
}

/// Reason an application field was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuditDetail {
    pub field: String,
    pub field_name: String,
    pub reject_reason: String,
}

/// Settlement account of a sub merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Apply4SubQuerySettlement {
    pub account_type: String,
    pub account_bank: String,
    pub bank_name: Option<String>,
    pub bank_branch_id: Option<String>,
    /// Masked account number.
    pub account_number: String,
    pub verify_result: String,
    pub verify_fail_reason: Option<String>,
}

impl Apply4SubQuery {
    /// Check if the sub merchant has been created.
    pub fn is_finished(&self) -> bool {
        self.applyment_state == "APPLYMENT_STATE_FINISHED"
    }
}
