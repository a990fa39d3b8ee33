//! Construcción de `StepGraph` a partir de un `FlowSpec`.
//!
//! Todo o nada: el primer nombre sin resolver (o persistencia desconocida)
//! aborta la construcción y no se devuelve ningún grafo parcial.
use flow_core::{FlowPersistence, GraphBuilder, LaunchStyle, StepGraph};
use log::{debug, warn};

use crate::{DecodeError, FlowSpec, StepRegistry};

pub fn build_graph(registry: &StepRegistry, spec: &FlowSpec) -> Result<StepGraph, DecodeError> {
    let supported = registry.supported_schema_version();
    if spec.schema_version == 0 || spec.schema_version > supported {
        warn!("decode:refused schema_version={} supported={supported}", spec.schema_version);
        return Err(DecodeError::UnsupportedSchemaVersion { found: spec.schema_version,
                                                           supported });
    }

    let mut builder = GraphBuilder::new();
    for entry in &spec.sequence {
        let name = entry.flow_representable_name.as_str();
        let Some(registered) = registry.resolve(name) else {
            warn!("decode:unresolved name={name}");
            return Err(DecodeError::UnresolvedStep(name.to_string()));
        };
        let mut descriptor = registered.clone();
        if let Some(style) = &entry.launch_style {
            descriptor = descriptor.with_launch_style(LaunchStyle::new(style.as_str()));
        }
        if let Some(persistence) = &entry.flow_persistence {
            descriptor = descriptor.with_persistence(parse_persistence(persistence)?);
        }
        builder.append(descriptor);
    }

    let graph = builder.build();
    debug!("decode:done steps={} hash={}", graph.len(), graph.definition_hash());
    Ok(graph)
}

/// Decodifica un workflow desde texto JSON.
pub fn decode_workflow(registry: &StepRegistry, json: &str) -> Result<StepGraph, DecodeError> {
    let spec: FlowSpec = serde_json::from_str(json)?;
    build_graph(registry, &spec)
}

pub fn decode_workflow_slice(registry: &StepRegistry, bytes: &[u8]) -> Result<StepGraph, DecodeError> {
    let spec: FlowSpec = serde_json::from_slice(bytes)?;
    build_graph(registry, &spec)
}

/// Nombre serializado de una persistencia. `"default"` equivale a la
/// persistencia por defecto.
pub fn parse_persistence(name: &str) -> Result<FlowPersistence, DecodeError> {
    if name == "default" {
        return Ok(FlowPersistence::default());
    }
    serde_json::from_value(serde_json::Value::String(name.to_string())).map_err(|_| DecodeError::UnknownPersistence(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_names_follow_wire_format() {
        assert_eq!(parse_persistence("removedAfterProceeding"), Ok(FlowPersistence::RemovedAfterProceeding));
        assert_eq!(parse_persistence("persistWhenSkipped"), Ok(FlowPersistence::PersistWhenSkipped));
        assert_eq!(parse_persistence("default"), Ok(FlowPersistence::PersistUntilRemoved));
        assert_eq!(parse_persistence("forever"), Err(DecodeError::UnknownPersistence("forever".into())));
    }

    #[test]
    fn schema_version_zero_is_rejected() {
        let registry = StepRegistry::new();
        let err = build_graph(&registry, &FlowSpec::new(0, Vec::<String>::new())).unwrap_err();
        assert_eq!(err,
                   DecodeError::UnsupportedSchemaVersion { found: 0,
                                                           supported: 1 });
    }
}
