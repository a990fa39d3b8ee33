//! Políticas asociadas a cada descriptor de paso.
//!
//! - `FlowPersistence`: si un paso saltado o ya superado sigue siendo
//!   alcanzable con `back_up`.
//! - `PersistenceRule`: la política puede ser fija o depender del `Envelope`
//!   que viaja hacia adelante.
//! - `LaunchStyle`: pista de presentación opaca. El motor la transporta hasta
//!   el responder sin interpretarla.
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowPersistence {
    /// Saltado: nunca entra a la cadena viva. Cargado: se poda al avanzar.
    RemovedAfterProceeding,
    /// Saltado: queda materializado (invisible) y alcanzable hacia atrás.
    PersistWhenSkipped,
    /// Permanece en la cadena viva hasta que termina la ejecución o se
    /// libera explícitamente.
    #[default]
    PersistUntilRemoved,
}

impl FlowPersistence {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowPersistence::RemovedAfterProceeding => "removedAfterProceeding",
            FlowPersistence::PersistWhenSkipped => "persistWhenSkipped",
            FlowPersistence::PersistUntilRemoved => "persistUntilRemoved",
        }
    }
}

impl fmt::Display for FlowPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type PersistenceFn = Arc<dyn Fn(&Envelope) -> FlowPersistence + Send + Sync>;

/// Política estática o calculada a partir del envelope entrante.
#[derive(Clone)]
pub enum PersistenceRule {
    Static(FlowPersistence),
    Dynamic(PersistenceFn),
}

impl PersistenceRule {
    pub fn dynamic<F>(f: F) -> Self
        where F: Fn(&Envelope) -> FlowPersistence + Send + Sync + 'static
    {
        PersistenceRule::Dynamic(Arc::new(f))
    }

    pub fn resolve(&self, args: &Envelope) -> FlowPersistence {
        match self {
            PersistenceRule::Static(p) => *p,
            PersistenceRule::Dynamic(f) => f(args),
        }
    }

    /// Valor fijo, si la regla no depende de los argumentos.
    pub fn static_value(&self) -> Option<FlowPersistence> {
        match self {
            PersistenceRule::Static(p) => Some(*p),
            PersistenceRule::Dynamic(_) => None,
        }
    }
}

impl Default for PersistenceRule {
    fn default() -> Self {
        PersistenceRule::Static(FlowPersistence::default())
    }
}

impl From<FlowPersistence> for PersistenceRule {
    fn from(p: FlowPersistence) -> Self {
        PersistenceRule::Static(p)
    }
}

impl fmt::Debug for PersistenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceRule::Static(p) => write!(f, "Static({p})"),
            PersistenceRule::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Estilo de presentación preferido ("default", "push", "modal", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchStyle(Cow<'static, str>);

impl LaunchStyle {
    pub const DEFAULT: LaunchStyle = LaunchStyle(Cow::Borrowed("default"));
    pub const PUSH: LaunchStyle = LaunchStyle(Cow::Borrowed("push"));
    pub const MODAL: LaunchStyle = LaunchStyle(Cow::Borrowed("modal"));

    pub fn new(name: impl Into<String>) -> Self {
        LaunchStyle(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LaunchStyle {
    fn default() -> Self {
        LaunchStyle::DEFAULT
    }
}

impl fmt::Display for LaunchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
