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

//! Typed payloads of PayPal REST APIs.

use paysign_core::Error;
use serde::{Deserialize, Serialize};

/// An order of the checkout API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: String,
    pub status: Option<String>,
    pub intent: Option<String>,
    pub payer: Option<serde_json::Value>,
    pub purchase_units: Vec<serde_json::Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    /// HATEOAS links, `approve` is where the buyer is redirected to.
    pub links: Vec<Link>,
}

impl Order {
    /// Find the link with relation `rel`.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }
}

/// A HATEOAS link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: Option<String>,
}

/// A JSON patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// `add`, `replace` or `remove`.
    pub op: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Patch {
    /// Build a `replace` operation.
    pub fn replace(path: &str, value: serde_json::Value) -> Self {
        Self {
            op: "replace".to_string(),
            path: path.to_string(),
            value: Some(value),
            from: None,
        }
    }
}

/// Error payload returned with a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
    pub debug_id: Option<String>,
    pub details: Vec<ErrorDetail>,
    pub links: Vec<Link>,
}

impl ErrorResponse {
    /// Decode the payload carried by a failed call.
    ///
    /// Returns `None` if the error has no body or it isn't a PayPal error.
    pub fn from_error(err: &Error) -> Option<Self> {
        let body = err.body()?;
        serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|v| !v.name.is_empty())
    }
}

/// Detail of an [`ErrorResponse`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub field: Option<String>,
    pub value: Option<String>,
    pub location: Option<String>,
    pub issue: String,
    pub description: Option<String>,
}
