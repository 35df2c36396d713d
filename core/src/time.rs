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

//! Time related utils.

use chrono::{FixedOffset, Utc};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into unix timestamp seconds: `1554208460`
pub fn format_timestamp(t: DateTime) -> String {
    t.timestamp().to_string()
}

/// Format time as `2016-04-05 09:30:00` in China Standard Time (UTC+8).
pub fn format_china_datetime(t: DateTime) -> String {
    // 8 hours is always in range.
    let cst = FixedOffset::east_opt(8 * 3600).expect("in bounds");
    t.with_timezone(&cst).format("%Y-%m-%d %H:%M:%S").to_string()
}
