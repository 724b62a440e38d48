//! Inbound API Gateway proxy event.
//!
//! Only the fields the relay reads are modelled; everything else in the event
//! is ignored.

use crate::error::RelayError;
use crate::models::conversation::ChatRequest;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: Option<bool>,

    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<Claims>,
}

/// Identity attributes from the upstream authorizer. Never used for access control.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
}

/// Who the gateway says is calling, for log lines only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Email(String),
    Username(String),
    Anonymous,
}

impl Identity {
    /// Email wins over username; blank values count as absent.
    pub fn from_claims(claims: Option<&Claims>) -> Self {
        let Some(claims) = claims else {
            return Identity::Anonymous;
        };

        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(email) = present(&claims.email) {
            Identity::Email(email)
        } else if let Some(username) = present(&claims.username) {
            Identity::Username(username)
        } else {
            Identity::Anonymous
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Identity::Email(v) | Identity::Username(v) => Some(v),
            Identity::Anonymous => None,
        }
    }
}

impl GatewayEvent {
    pub fn claims(&self) -> Option<&Claims> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.authorizer.as_ref())
            .and_then(|auth| auth.claims.as_ref())
    }

    pub fn identity(&self) -> Identity {
        Identity::from_claims(self.claims())
    }

    /// Decode the body into a [`ChatRequest`].
    pub fn chat_request(&self) -> Result<ChatRequest, RelayError> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| RelayError::MalformedRequest("request body is missing".to_string()))?;

        if self.is_base64_encoded.unwrap_or(false) {
            let bytes = STANDARD.decode(body).map_err(|e| {
                RelayError::MalformedRequest(format!("body is not valid base64: {}", e))
            })?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(email: Option<&str>, username: Option<&str>) -> Claims {
        Claims {
            email: email.map(String::from),
            username: username.map(String::from),
        }
    }

    #[test]
    fn email_takes_precedence() {
        let identity = Identity::from_claims(Some(&claims(Some("a@example.com"), Some("alice"))));
        assert_eq!(identity, Identity::Email("a@example.com".to_string()));
        assert_eq!(identity.display_name(), Some("a@example.com"));
    }

    #[test]
    fn username_is_the_fallback() {
        let identity = Identity::from_claims(Some(&claims(None, Some("alice"))));
        assert_eq!(identity, Identity::Username("alice".to_string()));
    }

    #[test]
    fn blank_email_falls_through_to_username() {
        let identity = Identity::from_claims(Some(&claims(Some("  "), Some("alice"))));
        assert_eq!(identity, Identity::Username("alice".to_string()));
    }

    #[test]
    fn no_claims_is_anonymous() {
        assert_eq!(Identity::from_claims(None), Identity::Anonymous);
        assert_eq!(
            Identity::from_claims(Some(&claims(None, None))),
            Identity::Anonymous
        );
        assert_eq!(Identity::Anonymous.display_name(), None);
    }

    #[test]
    fn claims_are_read_from_request_context() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "body": "{}",
            "requestContext": {
                "authorizer": {
                    "claims": {
                        "sub": "1234",
                        "cognito:username": "alice",
                        "email_verified": "true"
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(event.identity(), Identity::Username("alice".to_string()));
    }

    #[test]
    fn authorizer_without_claims_is_anonymous() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "body": "{}",
            "requestContext": {"authorizer": {"principalId": "user"}}
        }))
        .unwrap();

        assert_eq!(event.identity(), Identity::Anonymous);
    }

    #[test]
    fn null_fields_are_tolerated() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "body": null,
            "isBase64Encoded": null,
            "requestContext": null
        }))
        .unwrap();

        assert!(event.body.is_none());
        assert_eq!(event.identity(), Identity::Anonymous);
    }

    #[test]
    fn plain_body_is_decoded() {
        let event = GatewayEvent {
            body: Some(r#"{"message": "hello"}"#.to_string()),
            ..Default::default()
        };

        assert_eq!(event.chat_request().unwrap().message, "hello");
    }

    #[test]
    fn base64_body_is_decoded() {
        let event = GatewayEvent {
            body: Some(STANDARD.encode(r#"{"message": "こんにちは"}"#)),
            is_base64_encoded: Some(true),
            ..Default::default()
        };

        assert_eq!(event.chat_request().unwrap().message, "こんにちは");
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let event = GatewayEvent {
            body: Some("%%%".to_string()),
            is_base64_encoded: Some(true),
            ..Default::default()
        };

        assert!(matches!(
            event.chat_request(),
            Err(RelayError::MalformedRequest(_))
        ));
    }

    #[test]
    fn missing_body_is_malformed() {
        let err = GatewayEvent::default().chat_request().unwrap_err();
        assert!(matches!(err, RelayError::MalformedRequest(_)));
        assert!(err.to_string().contains("body is missing"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let event = GatewayEvent {
            body: Some("message=hello".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            event.chat_request(),
            Err(RelayError::MalformedRequest(_))
        ));
    }
}
