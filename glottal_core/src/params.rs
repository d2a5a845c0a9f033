use serde::Serialize;
use thiserror::Error;

use crate::MAX_MODEL_PARAMS;

/// Errors from parameter lookup.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Metadata for one named, bounded control.
#[derive(Debug, Clone, Copy)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamDescriptor {
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            default,
            min,
            max,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Read-only view of one table entry, serializable for host introspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSnapshot {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub current: f32,
}

struct Param {
    desc: ParamDescriptor,
    current: f32,
}

/// Ordered mapping of name -> descriptor + current value.
///
/// Membership is fixed at construction; only the current values mutate, and
/// every write is clamped into the descriptor's range. Unknown names are
/// silently ignored on `set` so the table tolerates host schema drift.
pub struct ParameterTable {
    params: Vec<Param>,
}

impl ParameterTable {
    pub fn from_descriptors(descriptors: &'static [ParamDescriptor]) -> Self {
        debug_assert!(descriptors.len() <= MAX_MODEL_PARAMS);
        Self {
            params: descriptors
                .iter()
                .map(|d| Param {
                    desc: *d,
                    current: d.default,
                })
                .collect(),
        }
    }

    /// Current value of `name`, or `UnknownParameter` if absent.
    pub fn get(&self, name: &str) -> Result<f32, ParamError> {
        self.params
            .iter()
            .find(|p| p.desc.name == name)
            .map(|p| p.current)
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))
    }

    /// Clamp `value` into range and store it. Unknown names are a no-op.
    pub fn set(&mut self, name: &str, value: f32) {
        if let Some(p) = self.params.iter_mut().find(|p| p.desc.name == name) {
            p.current = p.desc.clamp(value);
        }
    }

    /// Clamped positional write. Out-of-range indices are a no-op.
    pub fn set_index(&mut self, index: usize, value: f32) {
        if let Some(p) = self.params.get_mut(index) {
            p.current = p.desc.clamp(value);
        }
    }

    /// Restore every current value to its default.
    pub fn reset(&mut self) {
        for p in &mut self.params {
            p.current = p.desc.default;
        }
    }

    /// Position of `name` in table order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.desc.name == name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Copy the current values into a fixed-size array for the render path.
    /// Slots past `len()` are left untouched.
    pub fn values_into(&self, out: &mut [f32; MAX_MODEL_PARAMS]) {
        for (slot, p) in out.iter_mut().zip(&self.params) {
            *slot = p.current;
        }
    }

    /// Full ordered view of the table.
    pub fn snapshot(&self) -> Vec<ParamSnapshot> {
        self.params
            .iter()
            .map(|p| ParamSnapshot {
                name: p.desc.name,
                default: p.desc.default,
                min: p.desc.min,
                max: p.desc.max,
                current: p.current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DESCS: &[ParamDescriptor] = &[
        ParamDescriptor::new("Oq", 0.6, 0.2, 0.8),
        ParamDescriptor::new("am", 0.77, 0.74, 0.95),
    ];

    #[test]
    fn test_defaults_loaded() {
        let table = ParameterTable::from_descriptors(DESCS);
        assert_eq!(table.get("Oq"), Ok(0.6));
        assert_eq!(table.get("am"), Ok(0.77));
        assert!(!table.is_empty());
        assert!(ParameterTable::from_descriptors(&[]).is_empty());
    }

    #[test]
    fn test_set_clamps_into_range() {
        let mut table = ParameterTable::from_descriptors(DESCS);

        table.set("Oq", 0.05);
        assert_eq!(table.get("Oq"), Ok(0.2));

        table.set("Oq", 3.0);
        assert_eq!(table.get("Oq"), Ok(0.8));

        table.set("Oq", 0.5);
        assert_eq!(table.get("Oq"), Ok(0.5));
    }

    #[test]
    fn test_unknown_name_semantics() {
        let mut table = ParameterTable::from_descriptors(DESCS);

        // set ignores, get fails
        table.set("nope", 0.3);
        assert_eq!(
            table.get("nope"),
            Err(ParamError::UnknownParameter("nope".into()))
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut table = ParameterTable::from_descriptors(DESCS);
        table.set("Oq", 0.33);
        table.set("am", 0.9);
        table.reset();

        for snap in table.snapshot() {
            assert_eq!(snap.current, snap.default);
        }
    }

    #[test]
    fn test_values_into_preserves_order() {
        let mut table = ParameterTable::from_descriptors(DESCS);
        table.set("am", 0.8);

        let mut vals = [0.0; MAX_MODEL_PARAMS];
        table.values_into(&mut vals);
        assert_eq!(vals[0], 0.6);
        assert_eq!(vals[1], 0.8);
    }
}
