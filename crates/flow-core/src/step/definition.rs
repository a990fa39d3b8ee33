use std::any::type_name;

use super::StepHandle;
use crate::model::LaunchStyle;

/// Contrato de un paso del workflow.
///
/// Un paso no conoce a sus vecinos: sólo declara qué recibe (`Input`) y qué
/// entrega al avanzar (`Output`).
///
/// - `Input = ()`: el paso ignora lo que reciba.
/// - `Input = Envelope`: passthrough, recibe el sobre completo.
/// - `Output = ()`: no aporta datos (avanza con `Envelope::Empty`).
/// - `Output = Envelope`: reenvía un sobre sin tiparlo.
pub trait FlowStep: Sized + 'static {
    type Input: Clone + 'static;
    type Output: Send + Sync + 'static;

    /// Nombre estable del paso; es la clave en los flujos serializados.
    fn name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Fábrica: construye la instancia a partir de su entrada tipada.
    fn create(input: Self::Input) -> Self;

    /// Predicado de carga. Se evalúa justo después de `create`; `false`
    /// significa que el paso no se presenta en este recorrido.
    fn should_load(&self) -> bool {
        true
    }

    /// Salida a usar cuando el paso se salta. `None` deja pasar el envelope
    /// entrante sin cambios.
    fn skipped_output(&self) -> Option<Self::Output> {
        None
    }

    /// Llamado cuando el engine materializa la instancia en la cadena viva.
    fn on_attach(&mut self, _handle: StepHandle) {}

    fn preferred_launch_style() -> LaunchStyle {
        LaunchStyle::DEFAULT
    }
}

/// Último segmento del path del tipo, sin parámetros genéricos.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
