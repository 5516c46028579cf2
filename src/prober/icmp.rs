//! ICMP echo prober
//!
//! Sends a sequence of echo requests to one host and folds the replies into
//! [`ProbeStatistics`]. Privileged sessions use raw sockets, unprivileged
//! ones the datagram ICMP sockets that Linux and macOS expose to ordinary
//! users.

use super::{ProbeError, ProbeRequest, Prober};
use crate::models::ProbeStatistics;
use crate::types::Transport;
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config as PingConfig, IcmpPacket, PingIdentifier, PingSequence, ICMP};
use tokio::time::{sleep_until, timeout, Instant};

/// Default echo payload size, matching the classic `ping` utility
const DEFAULT_PAYLOAD_SIZE: usize = 56;

/// ICMP echo implementation of [`Prober`]
#[derive(Debug, Clone)]
pub struct IcmpProber {
    interval: Duration,
    packet_wait: Duration,
    payload_size: usize,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self {
            interval: crate::defaults::DEFAULT_PROBE_INTERVAL,
            packet_wait: crate::defaults::DEFAULT_PACKET_WAIT,
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

impl IcmpProber {
    /// Create a prober with `ping`-like pacing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between consecutive echo requests.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the longest wait for a single reply.
    pub fn with_packet_wait(mut self, packet_wait: Duration) -> Self {
        self.packet_wait = packet_wait;
        self
    }

    /// Set the echo payload size in bytes.
    pub fn with_payload_size(mut self, payload_size: usize) -> Self {
        self.payload_size = payload_size;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn packet_wait(&self) -> Duration {
        self.packet_wait
    }
}

/// Resolve hostname to IP address.
async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}

fn open_client(ip: IpAddr, transport: Transport) -> std::io::Result<Client> {
    let kind = match ip {
        IpAddr::V4(_) => ICMP::V4,
        IpAddr::V6(_) => ICMP::V6,
    };
    let config = PingConfig::builder()
        .kind(kind)
        .sock_type_hint(transport.socket_type())
        .build();
    Client::new(&config)
}

fn packet_size(packet: &IcmpPacket) -> usize {
    match packet {
        IcmpPacket::V4(packet) => packet.get_size(),
        IcmpPacket::V6(packet) => packet.get_size(),
    }
}

fn print_summary(address: &str, stats: &ProbeStatistics) {
    eprintln!("\n--- {} ping statistics ---", address);
    eprintln!(
        "{} packets transmitted, {} packets received, {}% packet loss",
        stats.packets_sent, stats.packets_received, stats.packet_loss
    );
    eprintln!(
        "round-trip min/avg/max/stddev = {:?}/{:?}/{:?}/{:?}",
        stats.min_rtt, stats.avg_rtt, stats.max_rtt, stats.std_dev_rtt
    );
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeStatistics, ProbeError> {
        let address = request.address.as_str();
        let attempts = u16::try_from(request.attempts).map_err(|_| {
            ProbeError::unavailable(
                address,
                format!("{} attempts exceed the 16-bit echo sequence", request.attempts),
            )
        })?;
        let deadline = Instant::now() + request.timeout;

        let ip = match timeout(request.timeout, resolve_host(address)).await {
            Ok(Ok(ip)) => ip,
            Ok(Err(e)) => {
                return Err(ProbeError::unavailable(address, format!("failed to resolve host: {}", e)));
            }
            Err(_) => return Err(ProbeError::timeout(address, request.timeout, None)),
        };

        let transport = Transport::from_privileged(request.privileged);
        let client = open_client(ip, transport).map_err(|e| {
            ProbeError::unavailable(
                address,
                format!("cannot open {} ICMP socket: {}", transport.name(), e),
            )
        })?;

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        let payload = vec![0u8; self.payload_size];
        let mut rtts = Vec::with_capacity(usize::from(attempts));
        let mut sent = 0u32;
        let mut out_of_time = false;

        for seq in 0..attempts {
            let sent_at = Instant::now();
            let remaining = deadline.saturating_duration_since(sent_at);
            if remaining.is_zero() {
                out_of_time = true;
                break;
            }

            pinger.timeout(self.packet_wait.min(remaining));
            sent += 1;
            match pinger.ping(PingSequence(seq), &payload).await {
                Ok((packet, rtt)) => {
                    if request.debug {
                        eprintln!(
                            "{} bytes from {}: icmp_seq={} time={:?}",
                            packet_size(&packet),
                            ip,
                            seq,
                            rtt
                        );
                    }
                    rtts.push(rtt);
                }
                Err(e) => {
                    if request.debug {
                        eprintln!("Request timeout for icmp_seq={} ({})", seq, e);
                    }
                }
            }

            if seq + 1 < attempts {
                let next_send = sent_at + self.interval;
                if next_send >= deadline {
                    out_of_time = true;
                    break;
                }
                sleep_until(next_send).await;
            }
        }

        let stats = ProbeStatistics::from_rtts(sent, rtts, Some(ip));
        if request.debug {
            print_summary(address, &stats);
        }

        if out_of_time || stats.packets_received == 0 {
            return Err(ProbeError::timeout(address, request.timeout, Some(stats)));
        }

        Ok(stats)
    }

    fn name(&self) -> &str {
        "icmp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prober_defaults() {
        let prober = IcmpProber::new();
        assert_eq!(prober.interval(), Duration::from_secs(1));
        assert_eq!(prober.packet_wait(), Duration::from_secs(1));
        assert_eq!(prober.payload_size, DEFAULT_PAYLOAD_SIZE);
        assert_eq!(prober.name(), "icmp");
    }

    #[test]
    fn test_prober_builders() {
        let prober = IcmpProber::new()
            .with_interval(Duration::from_millis(200))
            .with_packet_wait(Duration::from_millis(500))
            .with_payload_size(16);
        assert_eq!(prober.interval(), Duration::from_millis(200));
        assert_eq!(prober.packet_wait(), Duration::from_millis(500));
        assert_eq!(prober.payload_size, 16);
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let ip = resolve_host("127.0.0.1").await.unwrap();
        assert_eq!(ip, "127.0.0.1".parse::<IpAddr>().unwrap());

        let ip = resolve_host("::1").await.unwrap();
        assert!(ip.is_ipv6());
    }

    #[tokio::test]
    async fn test_unresolvable_host_fails() {
        let request = ProbeRequest {
            address: "no-such-host.invalid".to_string(),
            attempts: 1,
            timeout: Duration::from_secs(5),
            privileged: false,
            debug: false,
        };

        let result = IcmpProber::new().probe(&request).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_oversized_attempts_rejected_before_sending() {
        let request = ProbeRequest {
            address: "127.0.0.1".to_string(),
            attempts: 70_000,
            timeout: Duration::from_secs(1),
            privileged: false,
            debug: false,
        };

        match IcmpProber::new().probe(&request).await {
            Err(ProbeError::Unavailable { reason, .. }) => assert!(reason.contains("16-bit")),
            other => panic!("expected an unavailable error, got {:?}", other),
        }
    }
}
