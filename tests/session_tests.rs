//! Session lifecycle tests with a real credential worker and scripted provider
//!
//! These drive the controller the way the UI does: call a transition, then
//! poll events until the expected phase shows up.

use async_trait::async_trait;
use restaurant_support::config::SupportConfig;
use restaurant_support::session::scripted::ScriptEvent;
use restaurant_support::session::{
    AssistantState, Script, ScriptStep, ScriptedProvider, SessionController, SessionPhase,
};
use restaurant_support::token::{SessionCredential, TokenClient};
use restaurant_support::transcript::Speaker;
use restaurant_support::{Result, SupportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Token client that counts calls and answers from a fixed outcome
struct CountingClient {
    calls: AtomicUsize,
    names: parking_lot::Mutex<Vec<String>>,
    fail: bool,
    delay: Duration,
}

impl CountingClient {
    fn with(fail: bool, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            names: parking_lot::Mutex::new(Vec::new()),
            fail,
            delay,
        })
    }

    fn ok() -> Arc<Self> {
        Self::with(false, Duration::ZERO)
    }

    fn failing() -> Arc<Self> {
        Self::with(true, Duration::ZERO)
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Self::with(false, delay)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenClient for CountingClient {
    async fn request_credential(&self, display_name: &str) -> Result<SessionCredential> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.lock().push(display_name.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            Err(SupportError::CredentialError("endpoint returned 500".to_string()))
        } else {
            Ok(SessionCredential::new(format!("token-for-{}", display_name)))
        }
    }
}

fn config() -> SupportConfig {
    SupportConfig::default().with_server_url("wss://rtc.test")
}

/// Poll until `done` holds or the timeout passes
fn poll_until(
    controller: &mut SessionController,
    timeout: Duration,
    done: impl Fn(&SessionController) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        controller.poll_events();
        if done(controller) {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

fn agent(delay_ms: u64, id: &str, text: &str, offset: Option<i64>) -> ScriptStep {
    ScriptStep {
        delay_ms,
        event: ScriptEvent::Agent {
            id: id.to_string(),
            text: text.to_string(),
            is_final: true,
            received_offset_ms: offset,
        },
    }
}

fn user(delay_ms: u64, id: &str, text: &str, offset: Option<i64>) -> ScriptStep {
    ScriptStep {
        delay_ms,
        event: ScriptEvent::User {
            id: id.to_string(),
            text: text.to_string(),
            is_final: true,
            received_offset_ms: offset,
        },
    }
}

fn state(delay_ms: u64, state: AssistantState) -> ScriptStep {
    ScriptStep {
        delay_ms,
        event: ScriptEvent::State { state },
    }
}

#[test]
fn test_name_to_connected_session() {
    let client = CountingClient::ok();
    let provider = ScriptedProvider::new(Script::new(vec![state(0, AssistantState::Listening)]));
    let mut controller =
        SessionController::spawn(config(), client.clone(), Arc::new(provider.clone())).unwrap();

    controller.open();
    controller.name_input = "  Maria  ".to_string();
    controller.submit_current_name().unwrap();
    assert_eq!(controller.phase(), SessionPhase::AwaitingCredential);
    assert!(controller.is_busy());

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.phase().is_connected()
    }));
    assert!(!controller.is_busy());
    assert!(controller.has_credential());

    // Exactly one request, with the trimmed name
    assert_eq!(client.calls(), 1);
    assert_eq!(client.names.lock().as_slice(), ["Maria"]);

    let connections = provider.connections();
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].server_url, "wss://rtc.test");
    assert!(connections[0].audio);
    assert!(!connections[0].video);

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.assistant_state() == AssistantState::Listening
    }));
}

#[test]
fn test_blank_name_sends_no_request() {
    let client = CountingClient::ok();
    let mut controller = SessionController::spawn(
        config(),
        client.clone(),
        Arc::new(ScriptedProvider::new(Script::default())),
    )
    .unwrap();

    controller.open();
    let err = controller.submit_name("   ").unwrap_err();
    assert!(matches!(err, SupportError::InvalidName(_)));
    assert_eq!(controller.phase(), SessionPhase::CollectingName);

    thread::sleep(Duration::from_millis(50));
    controller.poll_events();
    assert_eq!(client.calls(), 0);
}

#[test]
fn test_credential_failure_returns_to_name_entry() {
    let client = CountingClient::failing();
    let provider = ScriptedProvider::new(Script::default());
    let mut controller =
        SessionController::spawn(config(), client.clone(), Arc::new(provider.clone())).unwrap();

    controller.open();
    controller.name_input = "Maria".to_string();
    controller.submit_current_name().unwrap();

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.error().is_some()
    }));
    assert_eq!(controller.phase(), SessionPhase::CollectingName);
    assert!(!controller.is_busy());
    assert_eq!(controller.name_input, "Maria");
    assert_eq!(provider.connect_count(), 0);

    // The failure was reported once and never retried
    thread::sleep(Duration::from_millis(50));
    assert_eq!(client.calls(), 1);
}

#[test]
fn test_refused_connect_keeps_widget_open() {
    let client = CountingClient::ok();
    let mut controller =
        SessionController::spawn(config(), client, Arc::new(ScriptedProvider::refusing())).unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.error().is_some()
    }));
    assert_eq!(controller.phase(), SessionPhase::CollectingName);
    assert!(!controller.has_credential());
    assert!(!controller.take_close_request());
}

#[test]
fn test_cancel_discards_late_credential() {
    let client = CountingClient::slow(Duration::from_millis(150));
    let provider = ScriptedProvider::new(Script::default());
    let mut controller =
        SessionController::spawn(config(), client.clone(), Arc::new(provider.clone())).unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();
    controller.cancel().unwrap();
    assert!(controller.take_close_request());

    // Let the slow response arrive; it must not connect anything
    thread::sleep(Duration::from_millis(300));
    controller.poll_events();

    assert_eq!(client.calls(), 1);
    assert_eq!(controller.phase(), SessionPhase::CollectingName);
    assert_eq!(provider.connect_count(), 0);
}

#[test]
fn test_out_of_order_segments_are_merged_by_receipt_time() {
    // The agent line is delivered last but stamped before the user line
    let script = Script::new(vec![
        state(0, AssistantState::Listening),
        user(10, "user-1", "Hi, I'm Maria.", Some(200)),
        agent(30, "agent-1", "Hello, welcome!", Some(100)),
    ]);
    let mut controller = SessionController::spawn(
        config(),
        CountingClient::ok(),
        Arc::new(ScriptedProvider::new(script)),
    )
    .unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.messages().len() == 2
    }));

    let messages = controller.messages();
    assert_eq!(messages[0].speaker, Speaker::Agent);
    assert_eq!(messages[0].text, "Hello, welcome!");
    assert_eq!(messages[1].speaker, Speaker::User);
    assert_eq!(messages[1].text, "Hi, I'm Maria.");
}

#[test]
fn test_interim_segment_is_revised_in_place() {
    let script = Script::new(vec![
        ScriptStep {
            delay_ms: 0,
            event: ScriptEvent::Agent {
                id: "agent-1".to_string(),
                text: "Welcome".to_string(),
                is_final: false,
                received_offset_ms: Some(0),
            },
        },
        agent(20, "agent-1", "Welcome to Bella Vista!", Some(500)),
    ]);
    let mut controller = SessionController::spawn(
        config(),
        CountingClient::ok(),
        Arc::new(ScriptedProvider::new(script)),
    )
    .unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.messages().first().map(|m| m.is_final).unwrap_or(false)
    }));

    let messages = controller.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Welcome to Bella Vista!");
}

#[test]
fn test_end_call_clears_conversation() {
    let script = Script::new(vec![agent(0, "agent-1", "Hello!", None)]);
    let mut controller = SessionController::spawn(
        config(),
        CountingClient::ok(),
        Arc::new(ScriptedProvider::new(script)),
    )
    .unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();
    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        !c.messages().is_empty()
    }));

    controller.disconnect();
    assert_eq!(controller.phase(), SessionPhase::CollectingName);
    assert!(controller.messages().is_empty());
    assert!(!controller.has_credential());
    assert!(controller.take_close_request());

    // A second disconnect is harmless
    controller.disconnect();
    controller.poll_events();
    assert_eq!(controller.phase(), SessionPhase::CollectingName);
}

#[test]
fn test_provider_disconnect_returns_to_name_entry() {
    let script = Script::new(vec![
        state(0, AssistantState::Speaking),
        ScriptStep {
            delay_ms: 20,
            event: ScriptEvent::Disconnect {
                reason: Some("room closed".to_string()),
            },
        },
    ]);
    let mut controller = SessionController::spawn(
        config(),
        CountingClient::ok(),
        Arc::new(ScriptedProvider::new(script)),
    )
    .unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();
    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.phase().is_connected()
    }));
    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.phase().is_collecting_name()
    }));

    assert!(controller.take_close_request());
    assert!(controller.messages().is_empty());
    assert_eq!(controller.assistant_state(), AssistantState::Idle);
}

#[test]
fn test_muted_microphone_suppresses_user_speech() {
    let script = Script::new(vec![
        state(0, AssistantState::Listening),
        user(150, "user-1", "Can you hear me?", None),
        agent(50, "agent-1", "Are you still there?", None),
    ]);
    let mut controller = SessionController::spawn(
        config(),
        CountingClient::ok(),
        Arc::new(ScriptedProvider::new(script)),
    )
    .unwrap();

    controller.open();
    controller.submit_name("Maria").unwrap();
    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        c.phase().is_connected()
    }));

    controller.set_microphone_enabled(false).unwrap();
    assert!(!controller.microphone_enabled());

    assert!(poll_until(&mut controller, Duration::from_secs(5), |c| {
        !c.messages().is_empty()
    }));
    let messages = controller.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_agent());
}
