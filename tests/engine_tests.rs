use portsec::scanner::{ProbeTimeouts, UdpProbe};
use portsec::{run_scan, PortStatus, Protocol, ScanConfig, ScanEngine, ScanError, ScanResult};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Distinct ephemeral ports with nothing listening on them.
async fn free_tcp_ports(n: usize) -> Vec<u16> {
    let mut held = Vec::with_capacity(n);
    for _ in 0..n {
        held.push(TcpListener::bind((LOCALHOST, 0)).await.unwrap());
    }
    held.iter().map(|l| l.local_addr().unwrap().port()).collect()
}

fn sorted(mut results: Vec<ScanResult>) -> Vec<(u16, PortStatus)> {
    results.sort_by_key(|r| r.port);
    results.into_iter().map(|r| (r.port, r.status)).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tcp_scan_with_one_listener() {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let closed = free_tcp_ports(2).await;
    let (closed_a, closed_b) = (closed[0], closed[1]);

    let config = ScanConfig::new(LOCALHOST, vec![closed_a, open, closed_b], Protocol::Tcp, 2)
        .unwrap();
    let engine = ScanEngine::new(&config, &ProbeTimeouts::default()).unwrap();
    let results = engine.run().await;

    let mut expected = vec![
        (closed_a, PortStatus::Closed),
        (open, PortStatus::Open),
        (closed_b, PortStatus::Closed),
    ];
    expected.sort_by_key(|&(port, _)| port);
    assert_eq!(sorted(results), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tcp_scan_returns_one_result_per_port() {
    let mut listeners = Vec::new();
    let mut ports = Vec::new();
    for _ in 0..8 {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        ports.push(listener.local_addr().unwrap().port());
        listeners.push(listener);
    }

    let config = ScanConfig::new(LOCALHOST, ports.clone(), Protocol::Tcp, 3).unwrap();
    let results = ScanEngine::new(&config, &ProbeTimeouts::default())
        .unwrap()
        .run()
        .await;

    assert_eq!(results.len(), ports.len());
    assert!(results.iter().all(|r| r.status == PortStatus::Open));

    let mut seen: Vec<u16> = results.iter().map(|r| r.port).collect();
    seen.sort_unstable();
    ports.sort_unstable();
    assert_eq!(seen, ports);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn udp_scan_classifies_silent_and_answering_ports() {
    let silent = UdpSocket::bind((LOCALHOST, 0)).await.unwrap();
    let silent_port = silent.local_addr().unwrap().port();

    let echo = UdpSocket::bind((LOCALHOST, 0)).await.unwrap();
    let echo_port = echo.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        while let Ok((n, peer)) = echo.recv_from(&mut buf).await {
            let _ = echo.send_to(&buf[..n], peer).await;
        }
    });

    let config = ScanConfig::new(LOCALHOST, vec![silent_port, echo_port], Protocol::Udp, 2)
        .unwrap();
    let probe = UdpProbe::new(Duration::from_millis(200), Duration::from_millis(400));
    let results = run_scan(&config, probe).await;

    let mut expected = vec![
        (silent_port, PortStatus::OpenFiltered),
        (echo_port, PortStatus::Open),
    ];
    expected.sort_by_key(|&(port, _)| port);
    assert_eq!(sorted(results), expected);

    drop(silent);
}

#[test]
fn stealth_is_rejected_before_scanning() {
    let config = ScanConfig::new(LOCALHOST, vec![22], Protocol::Stealth, 1).unwrap();
    let err = ScanEngine::new(&config, &ProbeTimeouts::default()).err();
    assert!(matches!(
        err,
        Some(ScanError::UnsupportedProtocol(Protocol::Stealth))
    ));
}

#[test]
fn invalid_worker_counts_are_rejected() {
    tokio_test::assert_err!(ScanConfig::new(LOCALHOST, vec![22], Protocol::Tcp, 0));
    tokio_test::assert_err!(ScanConfig::new(LOCALHOST, vec![22], Protocol::Tcp, 101));
    tokio_test::assert_ok!(ScanConfig::new(LOCALHOST, vec![22], Protocol::Tcp, 100));
}
