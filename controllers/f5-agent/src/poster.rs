//! AS3 declaration transport: check, serialize, one POST.

use crate::error::AgentError;
use crate::sanity::SanityError;
use as3::Adc;
use bigip_client::BigIpClientTrait;
use tracing::{debug, info};

/// Structural check applied right before a declaration is posted
pub type DeclarationCheck = fn(&Adc) -> Result<(), SanityError>;

/// Post `adc` to the device
///
/// Nothing is sent if `check` rejects the declaration. There is no retry
/// here; a failed POST fails the cycle.
pub async fn post_declaration(
    adc: &Adc,
    client: &dyn BigIpClientTrait,
    check: DeclarationCheck,
) -> Result<(), AgentError> {
    check(adc)?;

    let body = serde_json::to_string(adc)?;
    debug!("AS3 declaration: {}", body);

    let response = client.post_declaration(body).await?;
    for result in &response.results {
        info!(
            "AS3 tenant {} applied on {}: {} ({})",
            result.tenant,
            client.host(),
            result.message,
            result.code
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanity::sanity_check_declaration;
    use as3::{Application, Tenant};
    use bigip_client::{BigIpError, MockBigIpClient};

    fn common_only_adc() -> Adc {
        let mut common = Tenant::default();
        common.add_application("Shared", Application::with_template("shared"));
        let mut adc = Adc::new();
        adc.add_tenant("Common", common);
        adc
    }

    #[tokio::test]
    async fn test_posts_serialized_declaration() {
        let client = MockBigIpClient::new("bigip-1.example.com");
        let adc = common_only_adc();

        post_declaration(&adc, &client, sanity_check_declaration)
            .await
            .unwrap();

        let posted = client.posted_declarations();
        assert_eq!(posted.len(), 1);
        let posted: serde_json::Value = serde_json::from_str(&posted[0]).unwrap();
        assert_eq!(posted, serde_json::to_value(&adc).unwrap());
    }

    #[tokio::test]
    async fn test_failed_check_posts_nothing() {
        let client = MockBigIpClient::new("bigip-1.example.com");

        let err = post_declaration(&Adc::new(), &client, sanity_check_declaration)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AgentError::Sanity(SanityError::MissingCommonTenant)
        ));
        assert!(client.posted_declarations().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_declaration_is_an_error() {
        let client = MockBigIpClient::new("bigip-1.example.com");
        client.fail_post("/Common/Shared/cc_andromeda_srv_10.0.0.1_dc1: unknown datacenter");

        let err = post_declaration(&common_only_adc(), &client, sanity_check_declaration)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AgentError::BigIp(BigIpError::DeclarationRejected { status: 422, .. })
        ));
        assert_eq!(client.posted_declarations().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_check_is_applied() {
        let client = MockBigIpClient::new("bigip-1.example.com");
        fn reject_all(_: &Adc) -> Result<(), SanityError> {
            Err(SanityError::MissingSharedApplication)
        }

        let result = post_declaration(&common_only_adc(), &client, reject_all).await;

        assert!(result.is_err());
        assert!(client.posted_declarations().is_empty());
    }
}
