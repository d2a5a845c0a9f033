pub mod glottal;

use crate::params::{ParamDescriptor, ParameterTable};
use crate::MAX_MODEL_PARAMS;

// Parameter schemas, shared with the host via descriptors().
// `Oq` is the open quotient, `am` the asymmetry coefficient.
static CUTOFF_SAWTOOTH_PARAMS: &[ParamDescriptor] =
    &[ParamDescriptor::new("Oq", 0.6, 0.2, 0.8)];

static ROSENBERG_C_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("Oq", 0.6, 0.1, 0.8),
    ParamDescriptor::new("am", 0.67, 0.55, 0.9),
];

static LILJENCRANTS_FANT_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("Oq", 0.6, 0.2, 0.8),
    ParamDescriptor::new("am", 0.77, 0.74, 0.95),
];

static KLGLOTT88_PARAMS: &[ParamDescriptor] =
    &[ParamDescriptor::new("Oq", 0.6, 0.1, 0.8)];

/// The concrete glottal waveform models.
///
/// Each variant pairs a parameter schema with a pure per-sample synthesis
/// function of the normalized phase time `t` in `[0, 1)`. Both the render
/// loop and plot rendering dispatch through `sample`, so the function must
/// stay deterministic and side-effect free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceModel {
    CutoffSawtooth,
    RosenbergC,
    LiljencrantsFant,
    Klglott88,
}

impl SourceModel {
    /// Parameter schema for this model, in table order.
    pub fn descriptors(self) -> &'static [ParamDescriptor] {
        match self {
            SourceModel::CutoffSawtooth => CUTOFF_SAWTOOTH_PARAMS,
            SourceModel::RosenbergC => ROSENBERG_C_PARAMS,
            SourceModel::LiljencrantsFant => LILJENCRANTS_FANT_PARAMS,
            SourceModel::Klglott88 => KLGLOTT88_PARAMS,
        }
    }

    /// One amplitude sample at phase time `t` in `[0, 1)`.
    ///
    /// `params` holds the current values in descriptor order (slot 0 = Oq,
    /// slot 1 = am where present).
    #[inline]
    pub fn sample(self, t: f32, params: &[f32; MAX_MODEL_PARAMS]) -> f32 {
        match self {
            SourceModel::CutoffSawtooth => glottal::cutoff_sawtooth(t, params[0]),
            SourceModel::RosenbergC => glottal::rosenberg_c(t, params[0], params[1]),
            SourceModel::LiljencrantsFant => {
                glottal::liljencrants_fant(t, params[0], params[1])
            }
            SourceModel::Klglott88 => glottal::klglott88(t, params[0]),
        }
    }

    /// Fresh parameter table loaded with this model's defaults.
    pub fn default_table(self) -> ParameterTable {
        ParameterTable::from_descriptors(self.descriptors())
    }

    /// Host-facing model name.
    pub fn name(self) -> &'static str {
        match self {
            SourceModel::CutoffSawtooth => "cutoffSawtooth",
            SourceModel::RosenbergC => "rosenbergC",
            SourceModel::LiljencrantsFant => "LF",
            SourceModel::Klglott88 => "KLGLOTT88",
        }
    }

    /// Model selection by host-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cutoffSawtooth" => Some(SourceModel::CutoffSawtooth),
            "rosenbergC" => Some(SourceModel::RosenbergC),
            "LF" => Some(SourceModel::LiljencrantsFant),
            "KLGLOTT88" => Some(SourceModel::Klglott88),
            _ => None,
        }
    }

    pub const ALL: [SourceModel; 4] = [
        SourceModel::CutoffSawtooth,
        SourceModel::RosenbergC,
        SourceModel::LiljencrantsFant,
        SourceModel::Klglott88,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_values(model: SourceModel) -> [f32; MAX_MODEL_PARAMS] {
        let mut vals = [0.0; MAX_MODEL_PARAMS];
        model.default_table().values_into(&mut vals);
        vals
    }

    #[test]
    fn test_name_round_trip() {
        for model in SourceModel::ALL {
            assert_eq!(SourceModel::from_name(model.name()), Some(model));
        }
        assert_eq!(SourceModel::from_name("theremin"), None);
    }

    #[test]
    fn test_descriptor_invariants() {
        for model in SourceModel::ALL {
            for d in model.descriptors() {
                assert!(d.min < d.max, "{}", d.name);
                assert!(d.min <= d.default && d.default <= d.max, "{}", d.name);
            }
        }
    }

    #[test]
    fn test_samples_finite_over_cycle() {
        for model in SourceModel::ALL {
            let vals = default_values(model);
            for k in 0..1000 {
                let t = k as f32 / 1000.0;
                let y = model.sample(t, &vals);
                assert!(y.is_finite(), "{} at t={t}", model.name());
            }
        }
    }

    #[test]
    fn test_sample_is_deterministic() {
        for model in SourceModel::ALL {
            let vals = default_values(model);
            assert_eq!(model.sample(0.37, &vals), model.sample(0.37, &vals));
        }
    }
}
