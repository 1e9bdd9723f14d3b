// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::sync::Arc;
use std::time::Duration;

use dcb_core::{BoardConfig, Dcb};

fn board(actuator_timeout_ms: u64) -> Dcb {
    Dcb::from_config(&BoardConfig {
        identity: "DCB-IT".to_string(),
        station_id: "station-it".to_string(),
        io_count: 4,
        dispenser_count: 1,
        actuator_count: 1,
        actuator_timeout_ms,
        ..BoardConfig::default()
    })
}

#[tokio::test]
async fn test_move_lifecycle_over_the_wire() {
    let dcb = board(100);

    assert_eq!(dcb.prompt_command("MSP?0").await, "MSP:0=0\n");
    assert_eq!(dcb.prompt_command("MSP:0:50").await, "OK\n");
    assert_eq!(dcb.prompt_command("MSP?0").await, "MSP:0=50\n");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(dcb.prompt_command("MSP?0").await, "MSP:0=0\n");

    let actuator = dcb.actuators().get(0).unwrap();
    assert_eq!(actuator.current_position(), 50);
    assert!(!actuator.is_moving());
}

#[tokio::test]
async fn test_preempted_target_never_arrives() {
    let dcb = board(300);

    assert_eq!(dcb.prompt_command("MSP:0:10").await, "OK\n");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(dcb.prompt_command("MSP:0:20").await, "OK\n");

    tokio::time::sleep(Duration::from_millis(225)).await;
    assert_eq!(dcb.prompt_command("MSP?0").await, "MSP:0=20\n");
    assert_eq!(dcb.actuators().get(0).unwrap().current_position(), 0);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(dcb.prompt_command("MSP?0").await, "MSP:0=0\n");
    assert_eq!(dcb.actuators().get(0).unwrap().current_position(), 20);
}

#[tokio::test]
async fn test_every_bank_is_bounds_checked() {
    let dcb = board(100);
    for line in ["DOP?4", "DSP:1", "MSP?1", "MSP:1:5"] {
        assert_eq!(dcb.prompt_command(line).await, "ERROR\n", "line {:?}", line);
    }
    for line in ["DOP?3", "DSP:0", "MSP?0"] {
        assert_ne!(dcb.prompt_command(line).await, "ERROR\n", "line {:?}", line);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connections_share_one_board() {
    let dcb = Arc::new(Dcb::from_config(&BoardConfig {
        io_count: 4,
        dispenser_count: 2,
        actuator_count: 4,
        actuator_timeout_ms: 50,
        ..BoardConfig::default()
    }));

    let mut clients = Vec::new();
    for idx in 0..4usize {
        let dcb = Arc::clone(&dcb);
        clients.push(tokio::spawn(async move {
            let target = (idx as i64 + 1) * 100;
            for _ in 0..5 {
                assert_eq!(
                    dcb.prompt_command(&format!("MSP:{}:{}", idx, target)).await,
                    "OK\n"
                );
                let reply = dcb.prompt_command(&format!("MSP?{}", idx)).await;
                let zero = format!("MSP:{}=0\n", idx);
                let moving = format!("MSP:{}={}\n", idx, target);
                assert!(reply == zero || reply == moving, "reply {:?}", reply);
                assert_eq!(dcb.prompt_command(&format!("DSP:{}", idx % 2)).await, "OK\n");
            }
        }));
    }
    for client in clients {
        client.await.expect("client task panicked");
    }

    tokio::time::sleep(Duration::from_millis(250)).await;
    for idx in 0..4usize {
        let actuator = dcb.actuators().get(idx).unwrap();
        assert_eq!(actuator.current_position(), (idx as i64 + 1) * 100);
        assert_eq!(actuator.target_position(), 0);
    }
    assert!(dcb.dispensers().iter().all(|d| d.pour_start().is_some()));
}
