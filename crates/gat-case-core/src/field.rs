//! Statically declared field descriptors.
//!
//! Each record type publishes one descriptor table (name, kind, accessor,
//! mutator, quoting) built once behind a `Lazy`. The engine binds text to
//! fields by looking names up in that table; defaults come from the record's
//! `Default` impl, so a field that is absent or textually empty keeps it.
//!
//! ```ignore
//! static FIELDS: Lazy<Vec<FieldDescriptor<Zone>>> = Lazy::new(|| {
//!     vec![
//!         FieldDescriptor::int("i", |z: &Zone| z.i, |z, v| z.i = v),
//!         FieldDescriptor::text("zoname", |z: &Zone| z.zoname.clone(), |z, v| z.zoname = v),
//!     ]
//! });
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Float,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
        })
    }
}

/// A typed field value read from or written to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    /// Unquoted text form used by the legacy writer.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Float(v) => format_float(*v),
            FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Int(v) => Value::from(*v),
            FieldValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Format a float so integral values keep a decimal point (`138.0`, not `138`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Text could not be converted to the field's declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionFailure {
    pub expected: FieldKind,
}

enum Accessor<R> {
    Int {
        get: fn(&R) -> i64,
        set: fn(&mut R, i64),
    },
    Float {
        get: fn(&R) -> f64,
        set: fn(&mut R, f64),
    },
    Text {
        get: fn(&R) -> String,
        set: fn(&mut R, String),
    },
}

/// Describes one field of record type `R`.
pub struct FieldDescriptor<R> {
    name: &'static str,
    aliases: &'static [&'static str],
    access: Accessor<R>,
}

impl<R> FieldDescriptor<R> {
    pub fn int(name: &'static str, get: fn(&R) -> i64, set: fn(&mut R, i64)) -> Self {
        Self {
            name,
            aliases: &[],
            access: Accessor::Int { get, set },
        }
    }

    pub fn float(name: &'static str, get: fn(&R) -> f64, set: fn(&mut R, f64)) -> Self {
        Self {
            name,
            aliases: &[],
            access: Accessor::Float { get, set },
        }
    }

    pub fn text(name: &'static str, get: fn(&R) -> String, set: fn(&mut R, String)) -> Self {
        Self {
            name,
            aliases: &[],
            access: Accessor::Text { get, set },
        }
    }

    /// Alternate names accepted when binding (e.g. `ibus` for `i`).
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    pub fn kind(&self) -> FieldKind {
        match self.access {
            Accessor::Int { .. } => FieldKind::Int,
            Accessor::Float { .. } => FieldKind::Float,
            Accessor::Text { .. } => FieldKind::Text,
        }
    }

    pub fn value(&self, record: &R) -> FieldValue {
        match &self.access {
            Accessor::Int { get, .. } => FieldValue::Int(get(record)),
            Accessor::Float { get, .. } => FieldValue::Float(get(record)),
            Accessor::Text { get, .. } => FieldValue::Text(get(record)),
        }
    }

    /// Bind `text` to the field. Empty text leaves the default in place.
    pub fn assign_text(&self, record: &mut R, text: &str) -> Result<(), ConversionFailure> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        match &self.access {
            Accessor::Int { set, .. } => {
                let value = parse_int(trimmed).ok_or(ConversionFailure {
                    expected: FieldKind::Int,
                })?;
                set(record, value);
            }
            Accessor::Float { set, .. } => {
                let value = trimmed.parse::<f64>().map_err(|_| ConversionFailure {
                    expected: FieldKind::Float,
                })?;
                set(record, value);
            }
            Accessor::Text { set, .. } => set(record, text.to_string()),
        }
        Ok(())
    }

    pub fn assign(&self, record: &mut R, value: FieldValue) -> Result<(), ConversionFailure> {
        match (&self.access, value) {
            (Accessor::Int { set, .. }, FieldValue::Int(v)) => set(record, v),
            (Accessor::Float { set, .. }, FieldValue::Float(v)) => set(record, v),
            (Accessor::Float { set, .. }, FieldValue::Int(v)) => set(record, v as f64),
            (Accessor::Text { set, .. }, FieldValue::Text(v)) => set(record, v),
            (_, other) => return self.assign_text(record, &other.to_text()),
        }
        Ok(())
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("kind", &self.kind())
            .finish()
    }
}

// Integral floats ("1.0") are accepted; some writers emit every number that way.
fn parse_int(text: &str) -> Option<i64> {
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let f = text.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// A typed row bound through its descriptor table.
pub trait Record: Default + Clone + fmt::Debug + 'static {
    fn descriptors() -> &'static [FieldDescriptor<Self>];

    fn descriptor(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::descriptors().iter().find(|d| d.matches(name))
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        Self::descriptor(name).map(|d| d.value(self))
    }
}
