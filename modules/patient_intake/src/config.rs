use serde::{Deserialize, Serialize};

use crate::contract::model::MedicalAidName;

/// Configuration for the patient_intake module (`modules.patient_intake`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientIntakeConfig {
    #[serde(default = "default_max_dependants")]
    pub max_dependants: usize,
    /// Scheme preselected on a fresh form.
    #[serde(default = "default_medical_aid_name")]
    pub default_medical_aid_name: MedicalAidName,
}

impl Default for PatientIntakeConfig {
    fn default() -> Self {
        Self {
            max_dependants: default_max_dependants(),
            default_medical_aid_name: default_medical_aid_name(),
        }
    }
}

fn default_max_dependants() -> usize {
    20
}

fn default_medical_aid_name() -> MedicalAidName {
    MedicalAidName::Gems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let cfg: PatientIntakeConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.max_dependants, 20);
        assert_eq!(cfg.default_medical_aid_name, MedicalAidName::Gems);
    }

    #[test]
    fn scheme_uses_wire_name() {
        let cfg: PatientIntakeConfig = serde_json::from_value(serde_json::json!({
            "max_dependants": 3,
            "default_medical_aid_name": "CAPE_MEDICAL_PLAN"
        }))
        .unwrap();
        assert_eq!(cfg.max_dependants, 3);
        assert_eq!(cfg.default_medical_aid_name, MedicalAidName::CapeMedicalPlan);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<PatientIntakeConfig, _> =
            serde_json::from_value(serde_json::json!({ "max_dependents": 3 }));
        assert!(res.is_err());
    }
}
