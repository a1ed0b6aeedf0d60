//! Asset domain models: Domains and their Gateways

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Protocol a gateway speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayProtocol {
    #[default]
    Ssh,
    Rdp,
}

impl std::str::FromStr for GatewayProtocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssh" => Ok(GatewayProtocol::Ssh),
            "rdp" => Ok(GatewayProtocol::Rdp),
            _ => Err(format!("Unknown gateway protocol: {}", s)),
        }
    }
}

impl std::fmt::Display for GatewayProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayProtocol::Ssh => write!(f, "ssh"),
            GatewayProtocol::Rdp => write!(f, "rdp"),
        }
    }
}

impl sqlx::Type<sqlx::MySql> for GatewayProtocol {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for GatewayProtocol {
    fn decode(
        value: sqlx::mysql::MySqlValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::MySql>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for GatewayProtocol {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> std::result::Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        let s = match self {
            GatewayProtocol::Ssh => "ssh",
            GatewayProtocol::Rdp => "rdp",
        };
        <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&s, buf)
    }
}

/// Domain entity: a named network boundary owning zero or more gateways
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Domain {
    pub id: StringUuid,
    pub name: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Domain {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Gateway entity: a connectivity endpoint scoped to exactly one Domain
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gateway {
    pub id: StringUuid,
    pub domain_id: StringUuid,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub protocol: GatewayProtocol,
    pub username: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Gateway {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            domain_id: StringUuid::new_v4(),
            name: String::new(),
            address: String::new(),
            port: default_gateway_port(),
            protocol: GatewayProtocol::default(),
            username: None,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn default_gateway_port() -> u16 {
    22
}

/// Input for creating a new domain
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDomainInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 512))]
    pub comment: Option<String>,
}

/// Input for updating a domain
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDomainInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub comment: Option<String>,
}

/// Input for creating a new gateway
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGatewayInput {
    pub domain_id: StringUuid,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_address"))]
    pub address: String,
    #[serde(default = "default_gateway_port")]
    #[validate(range(min = 1))]
    pub port: u16,
    #[serde(default)]
    pub protocol: GatewayProtocol,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    #[validate(length(max = 512))]
    pub comment: Option<String>,
}

/// Input for updating a gateway
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGatewayInput {
    pub domain_id: Option<StringUuid>,
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_address"))]
    pub address: Option<String>,
    #[validate(range(min = 1))]
    pub port: Option<u16>,
    pub protocol: Option<GatewayProtocol>,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    #[validate(length(max = 512))]
    pub comment: Option<String>,
}

/// Validate a gateway address (hostname or IP literal)
fn validate_address(address: &str) -> Result<(), validator::ValidationError> {
    if ADDRESS_REGEX.is_match(address) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_address"))
    }
}

// Hostnames, IPv4 literals, and bracket-free IPv6 literals
lazy_static::lazy_static! {
    pub static ref ADDRESS_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9:]([A-Za-z0-9.:-]*[A-Za-z0-9])?$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_default() {
        let domain = Domain::default();
        assert!(!domain.id.is_nil());
        assert!(domain.comment.is_none());
    }

    #[test]
    fn test_gateway_default() {
        let gateway = Gateway::default();
        assert_eq!(gateway.port, 22);
        assert_eq!(gateway.protocol, GatewayProtocol::Ssh);
    }

    #[test]
    fn test_protocol_round_trip() {
        assert_eq!("ssh".parse::<GatewayProtocol>().unwrap(), GatewayProtocol::Ssh);
        assert_eq!("RDP".parse::<GatewayProtocol>().unwrap(), GatewayProtocol::Rdp);
        assert!("telnet".parse::<GatewayProtocol>().is_err());
        assert_eq!(GatewayProtocol::Rdp.to_string(), "rdp");
    }

    #[rstest::rstest]
    #[case("gw1.internal.example.com", true)]
    #[case("10.0.8.1", true)]
    #[case("fe80::1", true)]
    #[case("bastion-gw-01", true)]
    #[case("host name", false)]
    #[case("-leading-dash", false)]
    #[case("trailing-dot.", false)]
    #[case("", false)]
    fn test_address_regex(#[case] address: &str, #[case] valid: bool) {
        assert_eq!(ADDRESS_REGEX.is_match(address), valid);
    }

    #[test]
    fn test_create_gateway_input_defaults() {
        let input: CreateGatewayInput = serde_json::from_str(
            r#"{"domain_id": "550e8400-e29b-41d4-a716-446655440000", "name": "gw1", "address": "10.0.0.1"}"#,
        )
        .unwrap();
        assert_eq!(input.port, 22);
        assert_eq!(input.protocol, GatewayProtocol::Ssh);
    }

    #[test]
    fn test_create_gateway_input_rejects_bad_address() {
        use validator::Validate;

        let input = CreateGatewayInput {
            domain_id: StringUuid::new_v4(),
            name: "gw1".to_string(),
            address: "bad address".to_string(),
            port: 22,
            protocol: GatewayProtocol::Ssh,
            username: None,
            comment: None,
        };
        assert!(input.validate().is_err());
    }
}
