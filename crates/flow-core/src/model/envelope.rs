//! Envelope neutral del flujo.
//!
//! Un `Envelope` es la unidad de datos que viaja de un paso al siguiente. Es
//! opaco para el motor: sólo los dos pasos adyacentes conocen el tipo concreto
//! del payload. Una vez creado no se muta; cada `proceed` construye uno nuevo.
//!
//! Extracción:
//! - `extract::<T>()` devuelve `None` si el tipo dinámico no coincide.
//! - `extract_or(default)` aplica el valor por defecto del llamador.
//! - `force::<T>()` es el camino de "contrato": un desajuste produce
//!   `ContractViolation`.
//!
//! Dos tipos tienen tratamiento especial al extraer: `()` (el paso ignora su
//! entrada, siempre extraíble) y `Envelope` (paso passthrough, recibe el sobre
//! completo).
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::errors::ContractViolation;

/// Sobre de argumentos: vacío o un valor tipado borrado.
#[derive(Clone, Default)]
pub enum Envelope {
    /// Sin argumentos.
    #[default]
    Empty,
    /// Valor con tipo borrado.
    Value(Payload),
}

/// Payload compartido e inmutable de un `Envelope::Value`.
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Envelope {
    /// Envuelve `value`. Un `()` produce `Empty` y un `Envelope` se devuelve
    /// tal cual (no se anidan sobres).
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        let boxed = match boxed.downcast::<Envelope>() {
            Ok(envelope) => return *envelope,
            Err(other) => other,
        };
        if boxed.is::<()>() {
            return Envelope::Empty;
        }
        Envelope::Value(Payload { value: Arc::from(boxed),
                                  type_name: type_name::<T>() })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Envelope::Empty)
    }

    /// Nombre del tipo concreto del payload (diagnóstico).
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Envelope::Empty => None,
            Envelope::Value(p) => Some(p.type_name),
        }
    }

    /// `true` si el payload es exactamente `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Referencia al payload si su tipo dinámico es `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Envelope::Empty => None,
            Envelope::Value(p) => p.value.downcast_ref::<T>(),
        }
    }

    /// Extracción tipada segura; `None` ante cualquier desajuste.
    pub fn extract<T: Any + Clone>(&self) -> Option<T> {
        if TypeId::of::<T>() == TypeId::of::<Envelope>() {
            return (self as &dyn Any).downcast_ref::<T>().cloned();
        }
        if TypeId::of::<T>() == TypeId::of::<()>() {
            return (&() as &dyn Any).downcast_ref::<T>().cloned();
        }
        self.downcast_ref::<T>().cloned()
    }

    /// Extracción con valor por defecto provisto por el llamador.
    pub fn extract_or<T: Any + Clone>(&self, default: T) -> T {
        self.extract().unwrap_or(default)
    }

    /// Extracción forzada. Un desajuste es un error de programación: el grafo
    /// declaró tipos que en realidad no encadenan.
    pub fn force<T: Any + Clone>(&self) -> Result<T, ContractViolation> {
        self.extract().ok_or_else(|| ContractViolation::new(type_name::<T>(), self.describe()))
    }

    pub(crate) fn describe(&self) -> &'static str {
        self.type_name().unwrap_or("<empty>")
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Empty => f.write_str("Empty"),
            Envelope::Value(p) => write!(f, "Value({})", p.type_name),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_and_nested_envelopes_collapse() {
        assert!(Envelope::new(()).is_empty());
        let inner = Envelope::new(7u32);
        let outer = Envelope::new(inner);
        assert_eq!(outer.extract::<u32>(), Some(7));
        assert_eq!(outer.type_name(), Some("u32"));
    }

    #[test]
    fn mismatch_yields_none_or_default() {
        let env = Envelope::new(String::from("hola"));
        assert_eq!(env.extract::<u32>(), None);
        assert_eq!(env.extract_or(5u32), 5);
        assert_eq!(env.extract::<String>().as_deref(), Some("hola"));
        assert_eq!(Envelope::Empty.extract_or(String::from("x")), "x");
    }

    #[test]
    fn unit_and_passthrough_always_extract() {
        let env = Envelope::new(1.5f64);
        assert_eq!(env.extract::<()>(), Some(()));
        assert_eq!(Envelope::Empty.extract::<()>(), Some(()));
        let through = env.extract::<Envelope>().expect("passthrough");
        assert_eq!(through.extract::<f64>(), Some(1.5));
    }

    #[test]
    fn force_reports_contract_violation() {
        let err = Envelope::new(1i64).force::<String>().unwrap_err();
        assert_eq!(err.found, "i64");
        assert!(err.expected.ends_with("String"));
        let err = Envelope::Empty.force::<u8>().unwrap_err();
        assert_eq!(err.found, "<empty>");
    }
}
