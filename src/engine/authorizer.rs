use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const PRINCIPAL: &str = "user";
pub const WILDCARD_RESOURCE: &str = "*";
pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// Allow/Deny verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub principal: String,
    pub effect: Effect,
    pub resource: String,
}

/// Authorizer output in the gateway policy format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResult {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

impl From<AccessDecision> for AuthorizerResult {
    fn from(decision: AccessDecision) -> Self {
        AuthorizerResult {
            principal_id: decision.principal,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect: decision.effect,
                    resource: decision.resource,
                }],
            },
        }
    }
}

impl PolicyDocument {
    /// True when an Allow statement covers `method_arn` and no Deny does.
    pub fn permits(&self, method_arn: &str) -> bool {
        let covers = |s: &&Statement| {
            s.action == INVOKE_ACTION
                && (s.resource == WILDCARD_RESOURCE || s.resource == method_arn)
        };
        let denied = self
            .statement
            .iter()
            .filter(covers)
            .any(|s| s.effect == Effect::Deny);
        let allowed = self
            .statement
            .iter()
            .filter(covers)
            .any(|s| s.effect == Effect::Allow);
        allowed && !denied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthorizerEventType {
    #[default]
    Token,
    Request,
}

/// Inbound token authorizer payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuthorizerEvent {
    #[serde(rename = "type", default)]
    pub event_type: AuthorizerEventType,
    #[serde(default)]
    pub authorization_token: String,
    #[serde(default)]
    pub method_arn: String,
}

/// Hard authorizer failure. Distinct from a Deny decision and carries no detail.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unauthorized")]
pub struct AuthorizerFault;

/// Compares a presented token against the configured one.
///
/// Both sides are hashed first so the comparison cost does not depend on
/// how many leading bytes match.
pub fn authorize(supplied_token: &str, configured_token: &str) -> AccessDecision {
    let supplied = Sha256::digest(supplied_token.as_bytes());
    let configured = Sha256::digest(configured_token.as_bytes());
    let effect = if supplied == configured {
        Effect::Allow
    } else {
        Effect::Deny
    };
    AccessDecision {
        principal: PRINCIPAL.to_string(),
        effect,
        resource: WILDCARD_RESOURCE.to_string(),
    }
}

/// Token authorizer bound to the configured bearer token.
pub struct Authorizer {
    token: SecretString,
}

impl Authorizer {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Decides on a token event. The method ARN does not scope the decision.
    pub fn evaluate(
        &self,
        event: &TokenAuthorizerEvent,
    ) -> Result<AuthorizerResult, AuthorizerFault> {
        if event.event_type != AuthorizerEventType::Token {
            tracing::warn!(event_type = ?event.event_type, "authorizer received a non-token event");
            return Err(AuthorizerFault);
        }
        tracing::debug!(method_arn = %event.method_arn, "authorizing request");
        let decision = authorize(&event.authorization_token, self.token.expose_secret());
        metrics::counter!("authorizer_decisions_total", "effect" => decision.effect.as_str())
            .increment(1);
        Ok(decision.into())
    }
}
