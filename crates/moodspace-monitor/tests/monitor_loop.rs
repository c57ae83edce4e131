// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Monitor loop running on its own thread while clients poll it

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use moodspace_api::{DispatchOutcome, DispatcherConfig, RequestDispatcher};
use moodspace_engine::{ChaosEngine, EngineParams};
use moodspace_hal::{HostPlatform, SimulatedSensor};
use moodspace_monitor::MonitorLoop;

fn get(address: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(address).unwrap();
    write!(stream, "GET {} HTTP/1.1\r\nHost: test\r\n\r\n", path).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_serves_while_running() {
    let engine = ChaosEngine::new(SimulatedSensor::new(11), EngineParams::default());
    let mut dispatcher = RequestDispatcher::new(DispatcherConfig::new("127.0.0.1:0"));
    let address = dispatcher.start().unwrap();
    let mut monitor = MonitorLoop::new(engine, dispatcher, HostPlatform::new(), Duration::from_millis(5));

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    let worker = thread::spawn(move || {
        let iterations = monitor.run(&flag);
        (iterations, monitor)
    });

    for _ in 0..3 {
        let response = get(address, "/data");
        let body = response.split_once("\r\n\r\n").unwrap().1;
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        let level = json["caos"].as_u64().unwrap();
        assert!(level <= 100);
        let expected = match level {
            0..=29 => "Zen",
            30..=69 => "Active",
            _ => "Chaotic",
        };
        assert_eq!(json["etiqueta"], expected);
    }
    assert!(get(address, "/").contains("<title>MoodSpace Monitor</title>"));

    running.store(false, Ordering::SeqCst);
    let (iterations, monitor) = worker.join().unwrap();

    assert!(iterations > 0);
    assert_eq!(monitor.dispatcher().served(), 4);
    assert_eq!(monitor.engine().ticks(), iterations);
}

#[test]
fn test_idle_iteration_is_not_held_by_the_network() {
    let engine = ChaosEngine::new(SimulatedSensor::new(5), EngineParams::default());
    let mut dispatcher = RequestDispatcher::new(DispatcherConfig::new("127.0.0.1:0"));
    dispatcher.start().unwrap();
    let mut monitor = MonitorLoop::new(engine, dispatcher, HostPlatform::new(), Duration::ZERO);

    for _ in 0..50 {
        let report = monitor.run_iteration();
        assert_eq!(report.dispatch, DispatchOutcome::NoConnection);
        assert!(report.busy_us < 100_000, "idle iteration took {} us", report.busy_us);
    }
}
