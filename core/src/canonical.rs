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

//! Canonical forms of a [`ParameterMap`].
//!
//! - [`sign_string`] is the form that gets hashed or signed, it's never sent.
//! - [`to_xml`], [`to_json`] and [`to_form`] are transport forms and escape
//!   according to their format.

use crate::{Error, ParameterMap, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Key holding the signature, always excluded from the sign string.
pub const SIGN_KEY: &str = "sign";

/// Root element of the XML transport form.
pub const XML_ROOT: &str = "xml";

/// Build the sign string of `params`.
///
/// Keys are sorted ascending, empty values and [`SIGN_KEY`] are skipped, and pairs
/// are joined as `k=v&k=v`. Values are NOT escaped: remote services canonicalize
/// the raw text and we must reproduce it bit for bit.
///
/// ```shell
/// {b: 2, a: 1, sign: X, c: ""} => "a=1&b=2"
/// ```
pub fn sign_string(params: &ParameterMap) -> String {
    let mut pairs: Vec<(&str, String)> = params
        .iter()
        .filter(|(k, v)| *k != SIGN_KEY && !v.is_empty())
        .map(|(k, v)| (k, v.to_text()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(&v);
    }
    s
}

/// Serialize `params` as `<xml><k>v</k>...</xml>` in insertion order.
pub fn to_xml(params: &ParameterMap) -> Result<String> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Start(BytesStart::new(XML_ROOT)))?;
    for (k, v) in params.iter() {
        if !is_xml_name(k) {
            return Err(Error::invalid_value(format!(
                "key {k:?} is not a valid xml element name"
            )));
        }
        w.write_event(Event::Start(BytesStart::new(k)))?;
        w.write_event(Event::Text(BytesText::new(&v.to_text())))?;
        w.write_event(Event::End(BytesEnd::new(k)))?;
    }
    w.write_event(Event::End(BytesEnd::new(XML_ROOT)))?;

    Ok(String::from_utf8(w.into_inner())?)
}

/// Serialize `params` as a JSON object in insertion order.
pub fn to_json(params: &ParameterMap) -> Result<String> {
    Ok(serde_json::to_string(params)?)
}

/// Serialize `params` as `application/x-www-form-urlencoded`, skipping empty values.
pub fn to_form(params: &ParameterMap) -> String {
    let mut s = form_urlencoded::Serializer::new(String::new());
    for (k, v) in params.iter().filter(|(_, v)| !v.is_empty()) {
        s.append_pair(k, &v.to_text());
    }
    s.finish()
}

/// Parse a flat `<xml><k>v</k>...</xml>` document.
///
/// Element values are kept verbatim, whitespace included, since the service signs the
/// raw text. Whitespace between the fields is ignored. Elements nested deeper than the
/// first level are folded into their parent's text.
pub fn from_xml(content: &str) -> Result<ParameterMap> {
    let mut reader = Reader::from_str(content);

    let mut params = ParameterMap::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                if depth == 2 {
                    current = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    text.clear();
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if depth == 1 {
                    params.set(String::from_utf8_lossy(e.name().as_ref()).into_owned(), "");
                }
            }
            Event::Text(e) if depth >= 2 => text.push_str(&e.unescape()?),
            Event::CData(e) if depth >= 2 => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()))
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(k) = current.take() {
                        params.set(k, std::mem::take(&mut text));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(Error::invalid_value("content is not an xml document"));
    }
    Ok(params)
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
