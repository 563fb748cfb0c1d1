use serde::{Deserialize, Serialize};

use crate::{error::DomainError, melody::Melody};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    /// One `pitch offset_ms` pair per line.
    Text,
}

pub trait MelodyExporter {
    fn export(&self, melody: &Melody, format: ExportFormat) -> Result<Vec<u8>, DomainError>;
}

pub struct JsonExporter;

impl MelodyExporter for JsonExporter {
    fn export(&self, melody: &Melody, format: ExportFormat) -> Result<Vec<u8>, DomainError> {
        match format {
            ExportFormat::Json => serde_json::to_vec_pretty(melody)
                .map_err(|err| DomainError::Serialization(err.to_string())),
            other => Err(DomainError::validation(format!(
                "JsonExporter cannot handle {:?}",
                other
            ))),
        }
    }
}

pub struct TextExporter;

impl MelodyExporter for TextExporter {
    fn export(&self, melody: &Melody, format: ExportFormat) -> Result<Vec<u8>, DomainError> {
        match format {
            ExportFormat::Text => {
                let mut out = String::new();
                for event in melody.events() {
                    out.push_str(&format!("{} {}\n", event.pitch, event.offset_ms));
                }
                Ok(out.into_bytes())
            }
            other => Err(DomainError::validation(format!(
                "TextExporter cannot handle {:?}",
                other
            ))),
        }
    }
}

pub fn import_json(bytes: &[u8]) -> Result<Melody, DomainError> {
    serde_json::from_slice(bytes).map_err(|err| DomainError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pitch, RecordedEvent};

    fn melody() -> Melody {
        Melody::from_events(vec![
            RecordedEvent::new(Pitch::C, 0),
            RecordedEvent::new(Pitch::FSharp, 480),
        ])
        .unwrap()
    }

    #[test]
    fn exports_json() {
        let bytes = JsonExporter.export(&melody(), ExportFormat::Json).unwrap();
        let output = String::from_utf8(bytes.clone()).unwrap();
        assert!(output.contains("\"pitch\": \"F#\""));
        assert_eq!(import_json(&bytes).unwrap(), melody());
    }

    #[test]
    fn exports_text() {
        let bytes = TextExporter.export(&melody(), ExportFormat::Text).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "C 0\nF# 480\n");
    }

    #[test]
    fn exporters_reject_foreign_formats() {
        assert!(JsonExporter.export(&melody(), ExportFormat::Text).is_err());
        assert!(TextExporter.export(&melody(), ExportFormat::Json).is_err());
    }

    #[test]
    fn import_rejects_garbage() {
        assert!(matches!(
            import_json(b"not json"),
            Err(DomainError::Serialization(_))
        ));
    }
}
