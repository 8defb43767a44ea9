//! In-memory Typst World holding a single report source

use chrono::{DateTime, Datelike, Timelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use crate::compiler::errors::RenderError;

/// A world with one main file, report data in `sys.inputs` and a fixed clock
pub struct VirtualWorld {
    main: Source,
    font_cache: &'static FontCache,
    inputs: Dict,
    time: DateTime<Utc>,
    library: LazyHash<Library>,
}

impl VirtualWorld {
    pub fn new(
        source: String,
        inputs: serde_json::Map<String, serde_json::Value>,
        time: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        let id = FileId::new(None, VirtualPath::new("/main.typ"));
        let mut dict = Dict::new();
        for (key, value) in &inputs {
            dict.insert(key.as_str().into(), json_to_typst_value(value)?);
        }

        let library = Library::builder().with_inputs(dict.clone()).build();

        Ok(Self {
            main: Source::new(id, source),
            font_cache: global_font_cache(),
            inputs: dict,
            time,
            library: LazyHash::new(library),
        })
    }

    pub fn inputs(&self) -> &Dict {
        &self.inputs
    }
}

/// Convert a JSON value to a Typst value. Numbers stay numbers; report fields
/// that need a fixed precision are passed as preformatted strings.
fn json_to_typst_value(json: &serde_json::Value) -> Result<Value, RenderError> {
    match json {
        serde_json::Value::Null => Ok(Value::None),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(RenderError::InvalidInput(format!("Invalid number: {}", n)))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.as_str().into())),
        serde_json::Value::Array(arr) => {
            let items = arr
                .iter()
                .map(json_to_typst_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Array::from(items.as_slice())))
        }
        serde_json::Value::Object(obj) => {
            let mut dict = Dict::new();
            for (k, v) in obj {
                dict.insert(k.as_str().into(), json_to_typst_value(v)?);
            }
            Ok(Value::Dict(dict))
        }
    }
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let adjusted = self.time + chrono::Duration::hours(offset.unwrap_or(0));

        Datetime::from_ymd_hms(
            adjusted.year(),
            adjusted.month() as u8,
            adjusted.day() as u8,
            adjusted.hour() as u8,
            adjusted.minute() as u8,
            adjusted.second() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_main_source_available() {
        let world = VirtualWorld::new("Hello".to_string(), Default::default(), Utc::now()).unwrap();
        let source = world.source(world.main()).unwrap();
        assert_eq!(source.text(), "Hello");
    }

    #[test]
    fn test_other_files_not_found() {
        let world = VirtualWorld::new("Hello".to_string(), Default::default(), Utc::now()).unwrap();
        let other = FileId::new(None, VirtualPath::new("/logo.png"));
        assert!(world.file(other).is_err());
        assert!(world.source(other).is_err());
    }

    #[test]
    fn test_nested_inputs_converted() {
        let world = VirtualWorld::new(
            "test".to_string(),
            inputs(json!({
                "project": { "nom_projet": "Uciole" },
                "periods": [{ "conforme": true }, { "conforme": false }],
                "lr": 35.9,
            })),
            Utc::now(),
        )
        .unwrap();

        assert!(world.inputs().contains("project"));
        assert!(world.inputs().contains("periods"));
        assert!(world.inputs().contains("lr"));
    }

    #[test]
    fn test_today_uses_fixed_clock() {
        let time = DateTime::parse_from_rfc3339("2026-10-17T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let world = VirtualWorld::new("test".to_string(), Default::default(), time).unwrap();
        let today = world.today(None).unwrap();
        assert_eq!(today.year(), Some(2026));
        assert_eq!(today.month(), Some(10));
        assert_eq!(today.day(), Some(17));
    }
}
