//! EC2 instance provider.
//!
//! Calls the EC2 Query API action `StartInstances` over HTTPS, signing each
//! request with SigV4, and maps the XML answer onto [`InstanceStateChange`]
//! or a typed [`ProviderError`].
//!
//! # API Reference
//! Amazon EC2 API Reference, `StartInstances` and "Error codes".

use async_trait::async_trait;
use chrono::Utc;
use kindle_core::{InstanceId, InstanceState, InstanceStateChange};
use reqwest::header::CONTENT_TYPE;

use crate::config::Ec2Config;
use crate::provider::InstanceProvider;
use crate::sigv4::{self, SignableRequest, SigningScope};
use crate::ProviderError;

/// Query API version the request and response shapes follow.
pub const API_VERSION: &str = "2016-11-15";

const SERVICE: &str = "ec2";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Error codes that mean "you are not allowed to do this".
const ACCESS_DENIED_CODES: &[&str] = &[
    "UnauthorizedOperation",
    "AccessDenied",
    "AccessDeniedException",
];

/// EC2 provider backed by a single reusable HTTPS client.
#[derive(Debug, Clone)]
pub struct Ec2Provider {
    config: Ec2Config,
    client: reqwest::Client,
}

impl Ec2Provider {
    /// Create a provider and its HTTP client.
    ///
    /// # Errors
    /// Returns [`ProviderError::Config`] if the endpoint has no host or is
    /// not a bare origin (the Query API is served from `/`), or
    /// [`ProviderError::Transport`] if the TLS client cannot be initialised.
    pub fn new(config: Ec2Config) -> Result<Self, ProviderError> {
        let endpoint = &config.endpoint;
        if endpoint.host_str().is_none() {
            return Err(ProviderError::Config(format!("endpoint {endpoint} has no host")));
        }
        if endpoint.path() != "/" || endpoint.query().is_some() {
            return Err(ProviderError::Config(format!(
                "endpoint {endpoint} must not carry a path or query"
            )));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &Ec2Config {
        &self.config
    }

    /// `Host` header value for the configured endpoint, port included when explicit.
    fn host(&self) -> String {
        let endpoint = &self.config.endpoint;
        let host = endpoint.host_str().unwrap_or_default();
        match endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }
    }
}

#[async_trait]
impl InstanceProvider for Ec2Provider {
    async fn start_instance(&self, id: &InstanceId) -> Result<InstanceStateChange, ProviderError> {
        let body = start_instances_body(id);
        let host = self.host();
        let signable = SignableRequest {
            method: "POST",
            path: "/",
            query: &[],
            headers: &[("content-type", FORM_CONTENT_TYPE), ("host", host.as_str())],
            payload: body.as_bytes(),
        };
        let scope = SigningScope { region: &self.config.region, service: SERVICE, time: Utc::now() };
        let signed = sigv4::sign(&signable, &scope, &self.config.credentials)?;

        tracing::debug!(instance_id = %id, endpoint = %self.config.endpoint, "sending StartInstances");

        let mut request = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        for (name, value) in signed.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let change = parse_start_response(status, &text)?;
        tracing::debug!(
            instance_id = %change.instance_id,
            previous = %change.previous,
            current = %change.current,
            "StartInstances accepted"
        );
        Ok(change)
    }
}

/// Form body for a single-instance `StartInstances` call.
#[must_use]
pub fn start_instances_body(id: &InstanceId) -> String {
    format!(
        "Action=StartInstances&InstanceId.1={}&Version={API_VERSION}",
        sigv4::uri_encode(id.as_str())
    )
}

/// Interpret a `StartInstances` HTTP response.
///
/// # Errors
/// - [`ProviderError::AccessDenied`] for authorization error codes, or a 403
///   whose body carries no error code.
/// - [`ProviderError::Api`] for any other error response.
/// - [`ProviderError::InvalidResponse`] for a success response without an
///   instance item.
pub fn parse_start_response(status: u16, body: &str) -> Result<InstanceStateChange, ProviderError> {
    if (200..300).contains(&status) {
        parse_success(body)
    } else {
        Err(parse_error(status, body))
    }
}

fn parse_success(body: &str) -> Result<InstanceStateChange, ProviderError> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed XML: {e}")))?;

    let item = doc
        .descendants()
        .find(|n| n.has_tag_name("instancesSet"))
        .and_then(|set| set.children().find(|n| n.has_tag_name("item")))
        .ok_or_else(|| ProviderError::InvalidResponse("no instancesSet item in response".to_owned()))?;

    let instance_id = child_text(item, "instanceId")
        .ok_or_else(|| ProviderError::InvalidResponse("item has no instanceId".to_owned()))?;
    let instance_id = InstanceId::new(instance_id)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let state_name = |tag: &str| {
        item.children()
            .find(|n| n.has_tag_name(tag))
            .and_then(|state| child_text(state, "name"))
            .map_or_else(|| InstanceState::Unknown(String::new()), InstanceState::from_name)
    };

    Ok(InstanceStateChange::new(
        instance_id,
        state_name("previousState"),
        state_name("currentState"),
    ))
}

fn parse_error(status: u16, body: &str) -> ProviderError {
    let parsed = roxmltree::Document::parse(body).ok().and_then(|doc| {
        let error = doc.descendants().find(|n| n.has_tag_name("Error"))?;
        let code = child_text(error, "Code")?.to_owned();
        let message = child_text(error, "Message").unwrap_or_default().to_owned();
        Some((code, message))
    });

    match parsed {
        Some((code, message)) if ACCESS_DENIED_CODES.contains(&code.as_str()) => {
            ProviderError::AccessDenied { code, message }
        }
        Some((code, message)) => ProviderError::Api { status, code, message },
        None if status == 403 => ProviderError::AccessDenied {
            code: "Forbidden".to_owned(),
            message: truncate(body),
        },
        None => ProviderError::Api { status, code: "Unknown".to_owned(), message: truncate(body) },
    }
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
}

fn truncate(body: &str) -> String {
    const LIMIT: usize = 256;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AwsCredentials;

    const STARTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<StartInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
  <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
  <instancesSet>
    <item>
      <instanceId>i-1234567890abcdef0</instanceId>
      <currentState>
        <code>0</code>
        <name>pending</name>
      </currentState>
      <previousState>
        <code>80</code>
        <name>stopped</name>
      </previousState>
    </item>
  </instancesSet>
</StartInstancesResponse>"#;

    fn error_body(code: &str) -> String {
        format!(
            "<Response><Errors><Error><Code>{code}</Code><Message>details here</Message></Error></Errors>\
             <RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>"
        )
    }

    #[test]
    fn parses_state_change() {
        let change = match parse_start_response(200, STARTED) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(change.instance_id.as_str(), "i-1234567890abcdef0");
        assert_eq!(change.previous, InstanceState::Stopped);
        assert_eq!(change.current, InstanceState::Pending);
    }

    #[test]
    fn success_without_item_is_invalid_response() {
        let body = "<StartInstancesResponse><instancesSet/></StartInstancesResponse>";
        assert!(matches!(
            parse_start_response(200, body),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn success_with_garbage_is_invalid_response() {
        assert!(matches!(
            parse_start_response(200, "not xml"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn authorization_codes_are_access_denied() {
        for code in ACCESS_DENIED_CODES {
            let err = match parse_start_response(403, &error_body(code)) {
                Ok(c) => panic!("expected error, got {c:?}"),
                Err(e) => e,
            };
            assert!(err.is_access_denied(), "{code} must map to AccessDenied");
        }
    }

    #[test]
    fn auth_failure_is_not_access_denied() {
        // Bad or expired credentials are an operator problem, not a spent budget.
        let err = match parse_start_response(401, &error_body("AuthFailure")) {
            Ok(c) => panic!("expected error, got {c:?}"),
            Err(e) => e,
        };
        assert!(!err.is_access_denied());
        assert!(matches!(err, ProviderError::Api { status: 401, ref code, .. } if code == "AuthFailure"));
    }

    fn config_for(endpoint: &str) -> Ec2Config {
        let endpoint = match reqwest::Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => panic!("bad test url: {e}"),
        };
        let credentials = AwsCredentials::new("AKIDEXAMPLE", "secret", None);
        match Ec2Config::new("us-east-1", credentials) {
            Ok(config) => config.with_endpoint(endpoint),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn endpoint_with_path_is_rejected() {
        for endpoint in ["http://127.0.0.1:1/prefix%20x/", "http://127.0.0.1:1/ec2", "http://127.0.0.1:1/?a=b"] {
            match Ec2Provider::new(config_for(endpoint)) {
                Err(ProviderError::Config(msg)) => assert!(msg.contains("path or query"), "{msg}"),
                other => panic!("{endpoint}: expected Config error, got {other:?}"),
            }
        }
    }

    #[test]
    fn bare_origin_endpoint_is_accepted() {
        for endpoint in ["http://127.0.0.1:1", "https://ec2.us-east-1.amazonaws.com/"] {
            if let Err(e) = Ec2Provider::new(config_for(endpoint)) {
                panic!("{endpoint}: unexpected error: {e}");
            }
        }
    }

    #[test]
    fn other_codes_are_api_errors() {
        let err = match parse_start_response(400, &error_body("InvalidInstanceID.NotFound")) {
            Ok(c) => panic!("expected error, got {c:?}"),
            Err(e) => e,
        };
        match err {
            ProviderError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "InvalidInstanceID.NotFound");
                assert_eq!(message, "details here");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn bare_403_is_access_denied() {
        let err = match parse_start_response(403, "Forbidden") {
            Ok(c) => panic!("expected error, got {c:?}"),
            Err(e) => e,
        };
        assert!(err.is_access_denied());
    }

    #[test]
    fn bare_500_is_api_error() {
        let err = match parse_start_response(500, "") {
            Ok(c) => panic!("expected error, got {c:?}"),
            Err(e) => e,
        };
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }

    #[test]
    fn body_encodes_instance_id() {
        let id = match InstanceId::new("i-abc/1") {
            Ok(id) => id,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(
            start_instances_body(&id),
            "Action=StartInstances&InstanceId.1=i-abc%2F1&Version=2016-11-15"
        );
    }

    #[test]
    fn truncate_limits_long_bodies() {
        let long = "x".repeat(1000);
        let short = truncate(&long);
        assert_eq!(short.len(), 259);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("short"), "short");
    }
}
