//! # WiFi Association
//!
//! [`Network`] is what the controller needs from the link layer: join a network
//! within a time bound, and report the address and hardware id for the status
//! screens. [`LinuxNetwork`] asks NetworkManager to join (when an SSID is
//! configured) and then waits for the interface to get an IPv4 address.

use log::{debug, info, warn};
use std::net::IpAddr;
use std::process::Command;
use std::time::{Duration, Instant};

/// Address reported while the interface has none.
pub const UNASSIGNED_IP: &str = "0.0.0.0";

const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub trait Network {
    /// Join `ssid` and wait until connected or `timeout` passes.
    fn connect(&mut self, ssid: &str, password: &str, timeout: Duration) -> bool;

    /// Current IPv4 address, or [`UNASSIGNED_IP`].
    fn ip_address(&self) -> String;

    /// MAC address of the interface, colon separated.
    fn hardware_id(&self) -> String;

    fn is_connected(&self) -> bool;
}

/// Network interface managed by the host OS.
pub struct LinuxNetwork {
    interface: String,
}

impl LinuxNetwork {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }

    fn ipv4(&self) -> Option<IpAddr> {
        let interfaces = match local_ip_address::list_afinet_netifas() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                debug!("Cannot list interfaces: {}", e);
                return None;
            }
        };
        interfaces
            .into_iter()
            .find(|(name, ip)| name == &self.interface && ip.is_ipv4())
            .map(|(_, ip)| ip)
    }

    fn request_association(&self, ssid: &str, password: &str) {
        let mut command = Command::new("nmcli");
        command.args(["device", "wifi", "connect", ssid]);
        if !password.is_empty() {
            command.args(["password", password]);
        }
        command.args(["ifname", &self.interface]);

        match command.output() {
            Ok(output) if output.status.success() => debug!("nmcli accepted {}", ssid),
            Ok(output) => warn!(
                "nmcli failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("nmcli unavailable: {}", e),
        }
    }
}

impl Network for LinuxNetwork {
    fn connect(&mut self, ssid: &str, password: &str, timeout: Duration) -> bool {
        if !ssid.is_empty() {
            self.request_association(ssid, password);
        }

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(ip) = self.ipv4() {
                info!("{} connected, ip = {}", self.interface, ip);
                return true;
            }
            if Instant::now() >= deadline {
                warn!("{} has no address after {:?}", self.interface, timeout);
                return false;
            }
            debug!("waiting for connection...");
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn ip_address(&self) -> String {
        self.ipv4()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNASSIGNED_IP.to_string())
    }

    fn hardware_id(&self) -> String {
        let mac = mac_address::mac_address_by_name(&self.interface)
            .ok()
            .flatten()
            .or_else(|| mac_address::get_mac_address().ok().flatten());
        match mac {
            Some(mac) => mac.to_string().to_ascii_lowercase(),
            None => "00:00:00:00:00:00".to_string(),
        }
    }

    fn is_connected(&self) -> bool {
        self.ipv4().is_some()
    }
}

/// `aa:bb:cc` → `aabbcc`, as shown on the system info screen.
pub fn compact_hardware_id(id: &str) -> String {
    id.split(':').collect()
}
