use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::pane::DialoguePane;

#[derive(Clone, Debug)]
pub struct Interface {
    pub name: String,
    pub mac: String,
    pub ip: String,
    pub netmask: String,
    pub gateway: String,
    pub connected: bool,
}

#[derive(Clone, Debug)]
pub struct VirtualMachine {
    pub name: String,
    pub running: bool,
    pub memory_mib: u32,
    pub vcpus: u32,
}

/// Snapshot of host state shown by the status pages.
///
/// Stands in for the live data layer; values only change through dialogues
/// and the uptime tick.
#[derive(Clone, Debug)]
pub struct HostStatus {
    pub hostname: String,
    pub product: String,
    pub version: String,
    pub cpus: u32,
    pub memory_mib: u32,
    pub uptime: Duration,
    pub interfaces: Vec<Interface>,
    pub vms: Vec<VirtualMachine>,
}

impl HostStatus {
    pub fn demo() -> Self {
        Self {
            hostname: "virt-host-01".to_string(),
            product: "Host Console".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cpus: 16,
            memory_mib: 65536,
            uptime: Duration::ZERO,
            interfaces: vec![
                Interface {
                    name: "eth0".to_string(),
                    mac: "52:54:00:12:34:56".to_string(),
                    ip: "192.168.10.21".to_string(),
                    netmask: "255.255.255.0".to_string(),
                    gateway: "192.168.10.1".to_string(),
                    connected: true,
                },
                Interface {
                    name: "eth1".to_string(),
                    mac: "52:54:00:12:34:57".to_string(),
                    ip: String::new(),
                    netmask: String::new(),
                    gateway: String::new(),
                    connected: false,
                },
            ],
            vms: vec![
                VirtualMachine {
                    name: "build-runner".to_string(),
                    running: true,
                    memory_mib: 8192,
                    vcpus: 4,
                },
                VirtualMachine {
                    name: "database".to_string(),
                    running: true,
                    memory_mib: 16384,
                    vcpus: 8,
                },
                VirtualMachine {
                    name: "staging-web".to_string(),
                    running: false,
                    memory_mib: 2048,
                    vcpus: 2,
                },
            ],
        }
    }

    pub fn uptime(&self) -> String {
        let secs = self.uptime.as_secs();
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3600;
        let minutes = (secs % 3600) / 60;
        format!("{days}d {hours:02}:{minutes:02}")
    }
}

/// What the status pane shows for a menu choice, keyed by the choice handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusPage {
    Overview,
    Network,
    Interface(usize),
    VirtualMachines,
    Vm(usize),
    Hostname,
    Password,
    Quit,
}

impl StatusPage {
    pub fn handle(self) -> String {
        match self {
            StatusPage::Overview => "overview".to_string(),
            StatusPage::Network => "network".to_string(),
            StatusPage::Interface(i) => format!("iface:{i}"),
            StatusPage::VirtualMachines => "vms".to_string(),
            StatusPage::Vm(i) => format!("vm:{i}"),
            StatusPage::Hostname => "hostname".to_string(),
            StatusPage::Password => "password".to_string(),
            StatusPage::Quit => "quit".to_string(),
        }
    }

    pub fn from_handle(handle: &str) -> Result<Self> {
        let page = match handle.split_once(':') {
            Some(("iface", index)) => StatusPage::Interface(index.parse()?),
            Some(("vm", index)) => StatusPage::Vm(index.parse()?),
            Some(_) => bail!("unknown status page `{handle}`"),
            None => match handle {
                "overview" => StatusPage::Overview,
                "network" => StatusPage::Network,
                "vms" => StatusPage::VirtualMachines,
                "hostname" => StatusPage::Hostname,
                "password" => StatusPage::Password,
                "quit" => StatusPage::Quit,
                _ => bail!("unknown status page `{handle}`"),
            },
        };
        Ok(page)
    }

    pub fn fill(self, pane: &mut DialoguePane, host: &HostStatus) -> Result<()> {
        match self {
            StatusPage::Overview => {
                pane.add_title_field(&format!("{} {}", host.product, host.version));
                pane.add_status_field("Hostname", &host.hostname);
                pane.add_status_field("CPUs", &host.cpus.to_string());
                pane.add_status_field("Memory", &format!("{} MiB", host.memory_mib));
                pane.add_status_field("Uptime", &host.uptime());
                pane.new_line();
                let management = host
                    .interfaces
                    .iter()
                    .find(|i| i.connected)
                    .context("no management interface configured")?;
                pane.add_status_field("Management", &management.name);
                pane.add_status_field("IP address", &management.ip);
            }
            StatusPage::Network => {
                pane.add_title_field("Network and Management Interface");
                pane.add_wrapped_text_field(
                    "Press <Enter> to inspect the network interfaces of this host.",
                    None,
                );
                pane.new_line();
                for iface in &host.interfaces {
                    let state = if iface.connected { "connected" } else { "disconnected" };
                    pane.add_status_field(&iface.name, state);
                }
            }
            StatusPage::Interface(index) => {
                let iface = host
                    .interfaces
                    .get(index)
                    .with_context(|| format!("interface {index} not found"))?;
                pane.add_title_field(&format!("Interface {}", iface.name));
                pane.add_status_field("MAC", &iface.mac);
                if iface.connected {
                    pane.add_status_field("IP address", &iface.ip);
                    pane.add_status_field("Netmask", &iface.netmask);
                    pane.add_status_field("Gateway", &iface.gateway);
                } else {
                    pane.add_warning_field("This interface is not connected.");
                }
            }
            StatusPage::VirtualMachines => {
                pane.add_title_field("Virtual Machines");
                let running = host.vms.iter().filter(|vm| vm.running).count();
                pane.add_status_field("Running", &format!("{running} of {}", host.vms.len()));
                pane.new_line();
                for vm in &host.vms {
                    let state = if vm.running { "running" } else { "halted" };
                    pane.add_status_field(&vm.name, state);
                }
            }
            StatusPage::Vm(index) => {
                let vm = host
                    .vms
                    .get(index)
                    .with_context(|| format!("virtual machine {index} not found"))?;
                pane.add_title_field(&vm.name);
                pane.add_status_field("State", if vm.running { "running" } else { "halted" });
                pane.add_status_field("vCPUs", &vm.vcpus.to_string());
                pane.add_status_field("Memory", &format!("{} MiB", vm.memory_mib));
                pane.new_line();
                pane.add_wrapped_text_field("Press <Enter> to rename this virtual machine.", None);
            }
            StatusPage::Hostname => {
                pane.add_title_field("Hostname");
                pane.add_status_field("Current", &host.hostname);
                pane.new_line();
                pane.add_wrapped_text_field("Press <Enter> to change the hostname.", None);
            }
            StatusPage::Password => {
                pane.add_title_field("Authentication");
                pane.add_wrapped_text_field(
                    "Press <Enter> to change the password used to log in to this console.",
                    None,
                );
            }
            StatusPage::Quit => {
                pane.add_title_field("Quit");
                pane.add_wrapped_centred_text_field("Press <Enter> to leave the console.", None);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::PaneSizer;
    use crate::ui::PaneColours;

    #[test]
    fn handles_round_trip() {
        for page in [
            StatusPage::Overview,
            StatusPage::Interface(1),
            StatusPage::Vm(2),
            StatusPage::Quit,
        ] {
            assert_eq!(StatusPage::from_handle(&page.handle()).unwrap(), page);
        }
        assert!(StatusPage::from_handle("vm:x").is_err());
        assert!(StatusPage::from_handle("bogus").is_err());
    }

    #[test]
    fn missing_vm_is_an_error() {
        let mut pane = DialoguePane::new(PaneSizer::fixed(0, 0, 40, 20), PaneColours::default());
        let host = HostStatus::demo();
        assert!(StatusPage::Vm(99).fill(&mut pane, &host).is_err());
    }

    #[test]
    fn uptime_formats_days_and_minutes() {
        let mut host = HostStatus::demo();
        host.uptime = Duration::from_secs(86_400 + 3 * 3600 + 7 * 60);
        assert_eq!(host.uptime(), "1d 03:07");
    }
}
