//! Network interface resolution
//!
//! The summary reports on the interface carrying the default route, or on
//! every interface when the host has no default route.

use crate::MaintenanceError;
use crate::runner::CommandSpec;
use regex::Regex;

/// Default route line: `default via 192.168.1.1 dev eth0 proto dhcp ...`
const DEFAULT_ROUTE_PATTERN: &str = r"^default\b.*?\bdev\s+(\S+)";

/// Which interfaces the summary reports on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceSelection {
    Named(String),
    All,
}

/// One row of `ip -brief address`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddresses {
    pub name: String,
    pub state: String,
    pub addresses: Vec<String>,
}

/// Query the default route(s)
pub fn default_route_command() -> CommandSpec {
    CommandSpec::new("ip").args(["route", "show", "default"])
}

/// Query addresses of the selected interface, or of every interface
pub fn address_command(selection: &InterfaceSelection) -> CommandSpec {
    let command = CommandSpec::new("ip").args(["-brief", "address", "show"]);
    match selection {
        InterfaceSelection::Named(name) => command.args(["dev", name.as_str()]),
        InterfaceSelection::All => command,
    }
}

/// Interface of the first default route in `ip route` output
pub fn default_route_interface(route_table: &str) -> Result<Option<String>, MaintenanceError> {
    let pattern = Regex::new(DEFAULT_ROUTE_PATTERN)?;
    Ok(route_table
        .lines()
        .find_map(|line| pattern.captures(line.trim()))
        .map(|caps| caps[1].to_string()))
}

/// Pick the interface to report on
pub fn resolve(route_table: &str) -> Result<InterfaceSelection, MaintenanceError> {
    Ok(match default_route_interface(route_table)? {
        Some(name) => InterfaceSelection::Named(name),
        None => InterfaceSelection::All,
    })
}

/// Parse `ip -brief address` output
pub fn parse_brief_addresses(output: &str) -> Vec<InterfaceAddresses> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let state = fields.next().unwrap_or_default();
            Some(InterfaceAddresses {
                // veth pairs print as `veth1@if2`
                name: name.split('@').next().unwrap_or(name).to_string(),
                state: state.to_string(),
                addresses: fields.map(str::to_string).collect(),
            })
        })
        .collect()
}

/// Restrict an address listing to the selection
pub fn select_addresses(
    selection: &InterfaceSelection,
    interfaces: Vec<InterfaceAddresses>,
) -> Vec<InterfaceAddresses> {
    match selection {
        InterfaceSelection::All => interfaces,
        InterfaceSelection::Named(name) => {
            interfaces.into_iter().filter(|i| &i.name == name).collect()
        }
    }
}
