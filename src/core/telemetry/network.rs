//! Interface addresses and traffic counters.

use std::net::IpAddr;
use std::time::Duration;

use chrono::Local;
use sysinfo::Networks;

use super::types::{round2, NetworkUsage, TrafficSample};
use super::SensorReading;
use crate::core::sensors::{ProbeContext, SensorProvider, Strategy};
use crate::error::{MonitorError, Result};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Echo services that return the caller's public address as plain text
const PUBLIC_IP_ENDPOINTS: &[(&str, &str)] = &[
    ("ipify", "https://api.ipify.org"),
    ("icanhazip", "https://ipv4.icanhazip.com"),
];

/// Current address and cumulative traffic across all interfaces
pub fn collect(networks: &Networks) -> NetworkUsage {
    let (bytes_sent, bytes_recv) = totals(networks);
    NetworkUsage {
        local_ip: local_ip(networks),
        bytes_sent,
        bytes_recv,
    }
}

/// First non-loopback IPv4 address, interfaces taken in name order
pub fn local_ip(networks: &Networks) -> SensorReading<String> {
    let mut names: Vec<&String> = networks.keys().collect();
    names.sort();

    names
        .into_iter()
        .filter_map(|name| networks.get(name))
        .flat_map(|data| data.ip_networks().iter().map(|net| net.addr))
        .find(|addr| matches!(addr, IpAddr::V4(v4) if !v4.is_loopback()))
        .map(|addr| addr.to_string())
        .into()
}

/// (transmitted, received) bytes since boot
pub fn totals(networks: &Networks) -> (u64, u64) {
    networks.values().fold((0, 0), |(sent, recv), data| {
        (
            sent + data.total_transmitted(),
            recv + data.total_received(),
        )
    })
}

/// Cumulative traffic in megabytes, stamped with the local time of day
pub fn traffic_sample() -> TrafficSample {
    let networks = Networks::new_with_refreshed_list();
    let (sent, recv) = totals(&networks);
    TrafficSample {
        timestamp: Local::now().format("%H:%M:%S").to_string(),
        sent_mb: round2(sent as f64 / BYTES_PER_MB),
        recv_mb: round2(recv as f64 / BYTES_PER_MB),
    }
}

pub fn public_ip_provider() -> SensorProvider<String> {
    SensorProvider::new(
        "public_ip",
        PUBLIC_IP_ENDPOINTS
            .iter()
            .map(|&(name, url)| {
                Strategy::new(name, move |ctx: &ProbeContext| {
                    fetch_public_ip(url, ctx.command_timeout)
                })
            })
            .collect(),
    )
}

fn fetch_public_ip(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    parse_ip(&body)
}

pub(crate) fn parse_ip(body: &str) -> Result<String> {
    body.trim()
        .parse::<IpAddr>()
        .map(|addr| addr.to_string())
        .map_err(|_| MonitorError::invalid_input(format!("not an IP address: {:?}", body.trim())))
}
