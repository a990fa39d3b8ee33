use stepflow::demo::{decoded_profile_flow, registry, run_profile_demo, Account, Session, PROFILE_FLOW_JSON};
use stepflow::flow_adapters::{decode_workflow, DecodeError};
use stepflow::EngineConfig;

fn newcomer() -> Account {
    Account { email: "ana@example.com".to_string(),
              onboarded: false,
              token: None }
}

#[test]
fn first_visit_walks_every_screen_and_backs_up_once() {
    let report = run_profile_demo(&EngineConfig::default(), newcomer(), "ana@new.example.com").expect("demo");

    assert_eq!(report.transcript[..6],
               ["launch Onboarding (modal)",
                "proceed Onboarding -> Login (default)",
                "proceed Login -> Profile (default)",
                "proceed Profile -> ChangeEmail (default)",
                "back_up ChangeEmail -> Profile",
                "proceed Profile -> ChangeEmail (default)"]);
    assert!(report.transcript[6].starts_with("complete"));
    assert_eq!(report.transcript.len(), 7);
    assert_eq!(report.final_session,
               Some(Session { email: "ana@new.example.com".to_string(),
                              token: "demo-token".to_string() }));
    assert!(report.events > 0);
}

#[test]
fn returning_account_skips_onboarding_and_login() {
    let returning = Account { email: "bob@example.com".to_string(),
                              onboarded: true,
                              token: Some("stored".to_string()) };
    let report = run_profile_demo(&EngineConfig::default(), returning, "bob@new.example.com").expect("demo");

    assert_eq!(report.transcript[0], "launch Profile (default)");
    assert_eq!(report.transcript[2], "back_up ChangeEmail -> Profile");
    assert_eq!(report.final_session.map(|s| s.token), Some("stored".to_string()));
}

#[test]
fn event_recording_follows_configuration() {
    let config = EngineConfig { record_events: false,
                                ..EngineConfig::default() };
    let report = run_profile_demo(&config, newcomer(), "x@example.com").expect("demo");
    assert_eq!(report.events, 0);
}

#[test]
fn configured_schema_version_limits_decoding() {
    let config = EngineConfig::default();
    let newer = PROFILE_FLOW_JSON.replace("\"schemaVersion\": 1", "\"schemaVersion\": 2");

    assert!(matches!(decode_workflow(&registry(&config).expect("registry"), &newer),
                     Err(DecodeError::UnsupportedSchemaVersion { found: 2, .. })));

    let relaxed = EngineConfig { schema_version: 2,
                                 ..EngineConfig::default() };
    assert!(decode_workflow(&registry(&relaxed).expect("registry"), &newer).is_ok());
    assert_eq!(decoded_profile_flow(&config).expect("decode").len(), 4);
}
