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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used in paypal services.
pub const PAYPAL_CLIENT_ID: &str = "PAYPAL_CLIENT_ID";
pub const PAYPAL_SECRET: &str = "PAYPAL_SECRET";
pub const PAYPAL_ENVIRONMENT: &str = "PAYPAL_ENVIRONMENT";
pub const PAYPAL_BASE_URL: &str = "PAYPAL_BASE_URL";
pub const PAYPAL_DEBUG: &str = "PAYPAL_DEBUG";
pub const PAYPAL_TIMEOUT: &str = "PAYPAL_TIMEOUT";

// Hosts
pub const PRODUCTION_HOST: &str = "https://api-m.paypal.com";
pub const SANDBOX_HOST: &str = "https://api-m.sandbox.paypal.com";

// Paths
pub const ACCESS_TOKEN: &str = "/v1/oauth2/token";
pub const CHECKOUT_ORDERS: &str = "/v2/checkout/orders";

pub const AUTHORIZATION_PREFIX_BASIC: &str = "Basic ";
pub const AUTHORIZATION_PREFIX_BEARER: &str = "Bearer ";

/// Characters escaped in a path segment.
pub static PATH_SEGMENT_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
