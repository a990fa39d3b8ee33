//! Modelo serializado de un workflow.
use flow_core::StepGraph;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSpec {
    pub schema_version: u32,
    pub sequence: Vec<SequenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEntry {
    pub flow_representable_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_persistence: Option<String>,
}

impl SequenceEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self { flow_representable_name: name.into(),
               launch_style: None,
               flow_persistence: None }
    }
}

impl FlowSpec {
    pub fn new<I, S>(schema_version: u32, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { schema_version,
               sequence: names.into_iter().map(SequenceEntry::named).collect() }
    }

    /// Exporta un grafo ya construido. Las persistencias dinámicas no tienen
    /// forma serializada y se omiten (quedan las del registro al decodificar).
    pub fn from_graph(schema_version: u32, graph: &StepGraph) -> Self {
        let sequence = graph.iter()
                            .map(|d| SequenceEntry { flow_representable_name: d.name().to_string(),
                                                     launch_style: Some(d.launch_style().as_str().to_string()),
                                                     flow_persistence: d.persistence_rule()
                                                                        .static_value()
                                                                        .map(|p| p.as_str().to_string()) })
                            .collect();
        Self { schema_version,
               sequence }
    }

    pub fn names(&self) -> Vec<&str> {
        self.sequence.iter().map(|e| e.flow_representable_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_are_omitted_and_defaulted() {
        let spec = FlowSpec::new(1, ["Alpha", "Beta"]);
        let value = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(value,
                   json!({"schemaVersion": 1, "sequence": [
                       {"flowRepresentableName": "Alpha"},
                       {"flowRepresentableName": "Beta"}
                   ]}));

        let parsed: FlowSpec = serde_json::from_value(json!({
            "schemaVersion": 1,
            "sequence": [{"flowRepresentableName": "Alpha", "launchStyle": "modal"}]
        })).expect("parse");
        assert_eq!(parsed.sequence[0].launch_style.as_deref(), Some("modal"));
        assert_eq!(parsed.sequence[0].flow_persistence, None);
    }
}
