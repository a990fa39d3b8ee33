//! Flujo de ejemplo: alta de perfil.
//!
//! Onboarding → Login → Profile → ChangeEmail
//!
//! - `Onboarding` sólo se presenta si la cuenta no lo vio; se poda al avanzar.
//! - `Login` se salta si ya hay token y en ese caso entrega la sesión
//!   directamente (`skipped_output`); queda en la cadena para poder volver.
//! - `ChangeEmail` es el último paso; su salida llega al callback de
//!   finalización.
//!
//! El mismo flujo existe en forma tipada (`typed_profile_flow`) y serializada
//! (`PROFILE_FLOW_JSON`); ambas producen el mismo `definition_hash`.
use std::cell::RefCell;
use std::rc::Rc;

use flow_adapters::{decode_workflow, DecodeError, StepRegistry};
use flow_core::{step, Envelope, EventStore, FlowPersistence, FlowStep, InMemoryEventStore, LaunchStyle, NullEventStore,
                OnFinish, OrchestrationResponder, StepGraph, StepHandle, StepPosition, Workflow, WorkflowEngine,
                WorkflowSummary};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::errors::AppError;

pub const PROFILE_FLOW_JSON: &str = r#"{
    "schemaVersion": 1,
    "sequence": [
        { "flowRepresentableName": "Onboarding", "launchStyle": "modal", "flowPersistence": "removedAfterProceeding" },
        { "flowRepresentableName": "Login", "flowPersistence": "persistWhenSkipped" },
        { "flowRepresentableName": "Profile" },
        { "flowRepresentableName": "ChangeEmail" }
    ]
}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub onboarded: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
}

#[derive(Debug)]
pub struct Onboarding {
    pub account: Account,
}

impl FlowStep for Onboarding {
    type Input = Account;
    type Output = Account;

    fn create(account: Account) -> Self {
        Self { account }
    }

    fn should_load(&self) -> bool {
        !self.account.onboarded
    }

    fn preferred_launch_style() -> LaunchStyle {
        LaunchStyle::MODAL
    }
}

#[derive(Debug)]
pub struct Login {
    pub account: Account,
}

impl FlowStep for Login {
    type Input = Account;
    type Output = Session;

    fn create(account: Account) -> Self {
        Self { account }
    }

    fn should_load(&self) -> bool {
        self.account.token.is_none()
    }

    fn skipped_output(&self) -> Option<Session> {
        self.account.token.clone().map(|token| Session { email: self.account.email.clone(),
                                                         token })
    }
}

#[derive(Debug)]
pub struct Profile {
    pub session: Session,
}

impl FlowStep for Profile {
    type Input = Session;
    type Output = Session;

    fn create(session: Session) -> Self {
        Self { session }
    }
}

#[derive(Debug)]
pub struct ChangeEmail {
    pub session: Session,
}

impl FlowStep for ChangeEmail {
    type Input = Session;
    type Output = Session;

    fn create(session: Session) -> Self {
        Self { session }
    }
}

/// Registro con los cuatro pasos del flujo de perfil.
pub fn registry(config: &EngineConfig) -> Result<StepRegistry, DecodeError> {
    let mut registry = config.registry();
    registry.register::<Onboarding>()?
            .register::<Login>()?
            .register::<Profile>()?
            .register::<ChangeEmail>()?;
    Ok(registry)
}

pub fn decoded_profile_flow(config: &EngineConfig) -> Result<StepGraph, DecodeError> {
    decode_workflow(&registry(config)?, PROFILE_FLOW_JSON)
}

pub fn typed_profile_flow() -> StepGraph {
    Workflow::new(step::<Onboarding>().persistence(FlowPersistence::RemovedAfterProceeding)).then(step::<Login>().persistence(FlowPersistence::PersistWhenSkipped))
                                                                                           .then(step::<Profile>())
                                                                                           .then(step::<ChangeEmail>())
                                                                                           .build()
}

/// Responder de consola: registra cada transición con `log` y la guarda.
#[derive(Debug, Default)]
pub struct ConsoleResponder {
    pub transcript: Vec<String>,
}

impl ConsoleResponder {
    fn note(&mut self, line: String) {
        info!("{line}");
        self.transcript.push(line);
    }
}

impl OrchestrationResponder for ConsoleResponder {
    fn launch(&mut self, to: &StepPosition) {
        self.note(format!("launch {} ({})", to.name, to.launch_style));
    }

    fn proceed(&mut self, to: &StepPosition, from: &StepPosition) {
        self.note(format!("proceed {} -> {} ({})", from.name, to.name, to.launch_style));
    }

    fn back_up(&mut self, from: &StepPosition, to: &StepPosition) {
        self.note(format!("back_up {} -> {}", from.name, to.name));
    }

    fn abandon(&mut self, workflow: &WorkflowSummary, _on_finish: &mut OnFinish) {
        self.note(format!("abandon run={}", workflow.run_id));
    }

    fn complete(&mut self, workflow: &WorkflowSummary, args: &Envelope, _on_finish: &mut OnFinish) {
        self.note(format!("complete run={} steps={} last={:?}", workflow.run_id, workflow.step_count, args));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub run_id: Uuid,
    pub transcript: Vec<String>,
    pub final_session: Option<Session>,
    pub events: usize,
}

/// Recorre el flujo de perfil simulando al usuario: completa cada pantalla,
/// vuelve una vez desde `ChangeEmail` y termina cambiando el email.
pub fn run_profile_demo(config: &EngineConfig, account: Account, new_email: &str) -> Result<DemoReport, AppError> {
    let graph = decoded_profile_flow(config)?;
    if config.record_events {
        drive(WorkflowEngine::with_event_store(graph, ConsoleResponder::default(), InMemoryEventStore::default()),
              account,
              new_email)
    } else {
        drive(WorkflowEngine::with_event_store(graph, ConsoleResponder::default(), NullEventStore),
              account,
              new_email)
    }
}

fn drive<E: EventStore>(mut engine: WorkflowEngine<ConsoleResponder, E>,
                        account: Account,
                        new_email: &str)
                        -> Result<DemoReport, AppError> {
    let finished: Rc<RefCell<Option<Session>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    engine.launch_with(Envelope::new(account), move |args| {
              *sink.borrow_mut() = args.extract::<Session>();
          })?;

    let mut backed_up = false;
    while let Some(active) = engine.active() {
        let name = engine.position(active)?.name;
        match name.as_str() {
            "Onboarding" => {
                let account = engine.force_step::<Onboarding>(active)?.account.clone();
                engine.proceed_with::<Onboarding>(active,
                                                  Account { onboarded: true,
                                                            ..account })?;
            }
            "Login" => {
                let email = engine.force_step::<Login>(active)?.account.email.clone();
                engine.proceed_with::<Login>(active,
                                             Session { email,
                                                       token: "demo-token".to_string() })?;
            }
            "Profile" => {
                let session = engine.force_step::<Profile>(active)?.session.clone();
                engine.proceed_with::<Profile>(active, session)?;
            }
            "ChangeEmail" if !backed_up => {
                backed_up = true;
                engine.back_up()?;
            }
            "ChangeEmail" => change_email(&mut engine, active, new_email)?,
            _ => {
                engine.proceed(active, Envelope::Empty)?;
            }
        }
    }

    let events = engine.events().len();
    let report = DemoReport { run_id: engine.run_id(),
                              transcript: engine.responder().transcript.clone(),
                              final_session: finished.borrow().clone(),
                              events };
    Ok(report)
}

fn change_email<E: EventStore>(engine: &mut WorkflowEngine<ConsoleResponder, E>,
                               active: StepHandle,
                               new_email: &str)
                               -> Result<(), AppError> {
    let session = engine.force_step::<ChangeEmail>(active)?.session.clone();
    engine.proceed_with::<ChangeEmail>(active,
                                       Session { email: new_email.to_string(),
                                                 ..session })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_and_decoded_flows_match() {
        let decoded = decoded_profile_flow(&EngineConfig::default()).expect("decode");
        let typed = typed_profile_flow();
        assert_eq!(decoded.names(), typed.names());
        assert_eq!(decoded.definition_hash(), typed.definition_hash());
    }
}
