//! Active device selection for BigIP HA pairs.

use crate::error::AgentError;
use bigip_client::{BigIpClientTrait, Device};
use tracing::{info, warn};

/// Active module names that provide GSLB (appliance and VE lab license)
const DNS_MODULES: [&str; 2] = ["DNS Services", "DNS VE Lab"];

/// Find the device whose host name is a suffix of the session host name
pub fn filter_device_matching_hostname<'a>(
    devices: &'a [Device],
    hostname: &str,
) -> Result<&'a Device, AgentError> {
    devices
        .iter()
        .find(|device| !device.hostname.is_empty() && hostname.ends_with(&device.hostname))
        .ok_or_else(|| AgentError::Device(format!("device {hostname} not found")))
}

/// Fail unless the device has the DNS (GTM) module provisioned
pub fn ensure_dns_module(device: &Device) -> Result<(), AgentError> {
    let supported = device
        .active_modules
        .iter()
        .any(|module| DNS_MODULES.iter().any(|dns| module.contains(dns)));
    if supported {
        Ok(())
    } else {
        Err(AgentError::Device(format!(
            "device {} does not support DNS Services",
            device.name
        )))
    }
}

/// The device behind `client`, if it is the active member of its pair
pub async fn match_active_device(client: &dyn BigIpClientTrait) -> Result<Device, AgentError> {
    let devices = client.get_devices().await?;
    let device = filter_device_matching_hostname(&devices, client.host())?;
    if !device.is_active() {
        return Err(AgentError::Device(format!(
            "device {} is {}",
            device.name, device.failover_state
        )));
    }
    Ok(device.clone())
}

/// Connect to each configured device and keep the first active one
pub async fn select_active_device<C, F>(
    device_urls: &[String],
    connect: F,
) -> Result<(C, Device), AgentError>
where
    C: BigIpClientTrait,
    F: Fn(&str) -> Result<C, AgentError>,
{
    for url in device_urls {
        let client = match connect(url) {
            Ok(client) => client,
            Err(e) => {
                warn!("Skipping BigIP device: {}", e);
                continue;
            }
        };
        match match_active_device(&client).await {
            Ok(device) => {
                info!(
                    "Connected to {} {} ({})",
                    device.marketing_name, device.name, device.version
                );
                return Ok((client, device));
            }
            Err(e) => info!("BigIP {} not usable: {}", client.host(), e),
        }
    }
    Err(AgentError::Device(format!(
        "no active BigIP device among {} configured",
        device_urls.len()
    )))
}
