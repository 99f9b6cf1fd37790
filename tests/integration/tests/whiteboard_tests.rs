//! Whiteboard Integration Tests
//!
//! Every test starts its own broker on a loopback port, so no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test whiteboard_tests

use std::time::Duration;

use integration_tests::{closed_port, eventually, fixtures::whiteboard, TestBroker};
use reqwest::StatusCode;
use whiteboard_common::PublisherConfig;
use whiteboard_core::{Channel, Color};

const SETTLE: Duration = Duration::from_secs(5);

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let response = broker.get("/health").await.expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

// ============================================================================
// Drawing Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dot_reaches_subscribed_board() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let publisher = broker.state.publisher();
    let red = Channel::from("red");

    let mut painter = whiteboard(&broker.publisher_config()).unwrap();
    let mut viewer = whiteboard(&broker.publisher_config()).unwrap();

    viewer.set_subscribed(&red, true).unwrap();
    assert!(viewer.connect_to_publisher().await);
    assert!(painter.connect_to_publisher().await);

    assert!(
        eventually(SETTLE, || publisher.subscriber_count("red") == 1
            && publisher.property_count() == 4)
        .await
    );

    painter.select_publish_channel(&red).unwrap();
    painter.pointer_pressed(50.0, 60.0);

    let mut rendered = 0;
    assert!(
        eventually(SETTLE, || {
            rendered += viewer.process_pending();
            rendered >= 1
        })
        .await
    );
    assert_eq!(rendered, 1);

    assert_eq!(viewer.surface().pixel(50, 60), Some(Color::RED));
    assert_eq!(painter.surface().pixel(50, 60), Some(Color::RED));

    // The painter never subscribed, so nothing comes back to it
    assert_eq!(painter.process_pending(), 0);

    painter.stop().await;
    viewer.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsubscribed_channel_is_not_rendered() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let publisher = broker.state.publisher();

    let mut painter = whiteboard(&broker.publisher_config()).unwrap();
    let mut viewer = whiteboard(&broker.publisher_config()).unwrap();

    viewer.set_subscribed(&Channel::from("blue"), true).unwrap();
    assert!(viewer.connect_to_publisher().await);
    assert!(painter.connect_to_publisher().await);
    assert!(eventually(SETTLE, || publisher.subscriber_count("blue") == 1).await);

    painter.select_publish_channel(&Channel::from("green")).unwrap();
    painter.pointer_pressed(10.0, 10.0);
    painter.select_publish_channel(&Channel::from("blue")).unwrap();
    painter.pointer_pressed(90.0, 90.0);

    let mut rendered = 0;
    assert!(
        eventually(SETTLE, || {
            rendered += viewer.process_pending();
            rendered >= 1
        })
        .await
    );

    assert_eq!(viewer.surface().pixel(90, 90), Some(Color::BLUE));
    assert_eq!(viewer.surface().pixel(10, 10), Some(Color::WHITE));

    painter.stop().await;
    viewer.stop().await;
}

// ============================================================================
// Connection Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_binding_stays_disconnected() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let mut board = whiteboard(&broker.publisher_config_for("SomeoneElse")).unwrap();

    assert!(!board.connect_to_publisher().await);
    assert!(!board.communicator().is_connected());

    // Drawing still works locally and sends nothing
    board.pointer_pressed(20.0, 20.0);
    assert_eq!(board.surface().pixel(20, 20), Some(Color::BLACK));
    assert_eq!(broker.state.publisher().property_count(), 0);

    board.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_broker_stays_disconnected() {
    let port = closed_port().await.unwrap();
    let config = PublisherConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..PublisherConfig::default()
    };
    let board = whiteboard(&config).unwrap();

    assert!(!board.connect_to_publisher().await);
    assert!(!board.communicator().is_connected());
    board.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_removes_subscriptions_and_session() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let publisher = broker.state.publisher();
    let connections = broker.state.connection_manager();

    let mut board = whiteboard(&broker.publisher_config()).unwrap();
    let channels = board.palette().channels().to_vec();
    for channel in &channels {
        board.set_subscribed(channel, true).unwrap();
    }
    assert!(board.connect_to_publisher().await);

    assert!(
        eventually(SETTLE, || channels
            .iter()
            .all(|c| publisher.subscriber_count(c.name()) == 1))
        .await
    );
    assert_eq!(connections.connection_count(), 1);

    board.stop().await;

    assert!(channels.iter().all(|c| publisher.subscriber_count(c.name()) == 0));
    assert!(eventually(SETTLE, || connections.connection_count() == 0).await);

    // Registered properties outlive the session
    assert_eq!(publisher.property_count(), channels.len());
}
