//! HTTP request metadata for [`Logger::request`](crate::logger::Logger::request).

use crate::payload::Fields;
use serde_json::Value;
use std::borrow::Cow;

/// Query parameter carrying a registration key.
pub const REGKEY_PARAM: &str = "key";

pub const USER_AGENT_HEADER: &str = "User-Agent";

const COOKIE_HEADER: &str = "cookie";

/// Field names of a request log entry. Like the reserved payload keys,
/// these are parsed downstream and must stay stable.
pub mod keys {
    pub const RESPONSE_STATUS: &str = "responseStatus";
    pub const RESPONSE_TIME: &str = "responseTime";
    pub const REQUEST_METHOD: &str = "requestMethod";
    pub const REQUEST_URL: &str = "requestUrl";
    pub const USER_AGENT: &str = "userAgent";
    pub const REQUEST_PARAMS: &str = "requestParams";
    pub const REQUEST_HEADERS: &str = "requestHeaders";
    pub const USER_INFO: &str = "userInfo";
    pub const REGKEY: &str = "regkey";
}

/// Read-only view of an inbound HTTP request.
pub trait RequestContext {
    fn method(&self) -> &str;

    /// Request path, without the query string.
    fn uri(&self) -> &str;

    /// All values of a header joined with `", "`. Names match
    /// case-insensitively.
    fn header(&self, name: &str) -> Option<String>;

    /// First value of a query parameter.
    fn parameter(&self, name: &str) -> Option<String>;

    /// Every query parameter mapped to its first value.
    fn all_parameters(&self) -> Fields;

    /// Every header mapped to its joined values.
    fn all_headers(&self) -> Fields;
}

/// Owned snapshot of a request, for frameworks without a direct
/// [`RequestContext`] implementation.
#[derive(Debug, Clone, Default)]
pub struct RequestSnapshot {
    method: String,
    path: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl RequestSnapshot {
    /// `uri` may include a query string; it is split off and
    /// percent-decoded into parameters.
    pub fn new(method: impl Into<String>, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self {
            method: method.into(),
            path: path.to_string(),
            params: parse_query(query),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

impl RequestContext for RequestSnapshot {
    fn method(&self) -> &str {
        &self.method
    }

    fn uri(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<String> {
        join_values(
            self.headers
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
        )
    }

    fn parameter(&self, name: &str) -> Option<String> {
        first_value(&self.params, name)
    }

    fn all_parameters(&self) -> Fields {
        first_values(&self.params)
    }

    fn all_headers(&self) -> Fields {
        let mut out = Fields::new();
        for (name, _) in &self.headers {
            if out.keys().any(|seen| seen.eq_ignore_ascii_case(name)) {
                continue;
            }
            if let Some(joined) = self.header(name) {
                out.insert(name.clone(), Value::from(joined));
            }
        }
        out
    }
}

#[cfg(feature = "http")]
impl<B> RequestContext for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn uri(&self) -> &str {
        http::Request::uri(self).path()
    }

    fn header(&self, name: &str) -> Option<String> {
        join_values(
            self.headers()
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        )
    }

    fn parameter(&self, name: &str) -> Option<String> {
        let query = http::Request::uri(self).query().unwrap_or_default();
        first_value(&parse_query(query), name)
    }

    fn all_parameters(&self) -> Fields {
        let query = http::Request::uri(self).query().unwrap_or_default();
        first_values(&parse_query(query))
    }

    fn all_headers(&self) -> Fields {
        let mut out = Fields::new();
        for name in self.headers().keys() {
            if let Some(joined) = RequestContext::header(self, name.as_str()) {
                out.insert(name.as_str().to_string(), Value::from(joined));
            }
        }
        out
    }
}

fn join_values<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let values: Vec<&str> = values.collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

fn first_value(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
}

fn first_values(params: &[(String, String)]) -> Fields {
    let mut out = Fields::new();
    for (name, value) in params {
        if !out.contains_key(name) {
            out.insert(name.clone(), Value::from(value.as_str()));
        }
    }
    out
}

/// Split `a=1&b=two+words` into decoded pairs. Undecodable components are
/// kept as they came.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => spaced,
    }
}

/// Structured details and summary line of one request log entry.
#[derive(Debug, Clone)]
pub struct RequestDetails {
    /// `[<status>] [<elapsed>ms] [<method> <url>] <message>`
    pub summary: String,
    pub details: Fields,
}

impl RequestDetails {
    /// Collect everything a request log entry carries.
    ///
    /// If the request has a [`REGKEY_PARAM`] parameter and `user_info` has
    /// no `regkey` entry yet, the parameter value is inserted into
    /// `user_info` itself; an existing entry is never replaced. `extra`
    /// fields are added to the details but cannot replace the request
    /// fields. Cookie headers are left out unless `include_cookies` is set.
    pub fn extract(
        request: &dyn RequestContext,
        status: u16,
        elapsed_millis: u64,
        message: &str,
        user_info: &mut Fields,
        extra: Fields,
        include_cookies: bool,
    ) -> Self {
        if let Some(regkey) = request.parameter(REGKEY_PARAM) {
            user_info
                .entry(keys::REGKEY)
                .or_insert_with(|| Value::from(regkey));
        }

        let method = request.method();
        let url = request.uri();

        let mut headers = request.all_headers();
        if !include_cookies {
            headers.retain(|name, _| !name.eq_ignore_ascii_case(COOKIE_HEADER));
        }

        let mut details = extra;
        details.insert(keys::RESPONSE_STATUS.into(), Value::from(status));
        details.insert(keys::RESPONSE_TIME.into(), Value::from(elapsed_millis));
        details.insert(keys::REQUEST_METHOD.into(), Value::from(method));
        details.insert(keys::REQUEST_URL.into(), Value::from(url));
        match request.header(USER_AGENT_HEADER) {
            Some(agent) => {
                details.insert(keys::USER_AGENT.into(), Value::from(agent));
            }
            None => {
                details.remove(keys::USER_AGENT);
            }
        }
        details.insert(
            keys::REQUEST_PARAMS.into(),
            Value::Object(request.all_parameters()),
        );
        details.insert(keys::REQUEST_HEADERS.into(), Value::Object(headers));
        details.insert(keys::USER_INFO.into(), Value::Object(user_info.clone()));

        let summary = format!(
            "[{}] [{}ms] [{} {}] {}",
            status, elapsed_millis, method, url, message
        );

        Self { summary, details }
    }
}
