use serde::{Deserialize, Serialize};

/// One perspective-taking item: stand at one object, face another, point to a third.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    #[serde(rename = "id")]
    pub trial_id: String,
    #[serde(rename = "standing")]
    pub standing_id: String,
    #[serde(rename = "facing")]
    pub facing_id: String,
    #[serde(rename = "pointing")]
    pub pointing_id: String,
}

impl TrialSpec {
    pub fn new(trial_id: &str, standing: &str, facing: &str, pointing: &str) -> Self {
        Self {
            trial_id: trial_id.to_string(),
            standing_id: standing.to_string(),
            facing_id: facing.to_string(),
            pointing_id: pointing.to_string(),
        }
    }

    pub fn object_ids(&self) -> [&str; 3] {
        [&self.standing_id, &self.facing_id, &self.pointing_id]
    }
}

/// Scored answer to a test trial. Field names on the wire follow the survey raw-data format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialResponse {
    pub trial_id: String,
    #[serde(rename = "standing")]
    pub standing_id: String,
    #[serde(rename = "facing")]
    pub facing_id: String,
    #[serde(rename = "pointing")]
    pub pointing_id: String,
    #[serde(rename = "responseAngle")]
    pub response_angle_deg: f64,
    #[serde(rename = "correctAngle")]
    pub correct_angle_deg: f64,
    #[serde(rename = "angularError")]
    pub angular_error_deg: f64,
    #[serde(rename = "responseTime")]
    pub response_time_sec: f64,
}

impl TrialResponse {
    pub fn new(
        spec: &TrialSpec,
        response_angle_deg: f64,
        correct_angle_deg: f64,
        angular_error_deg: f64,
        response_time_sec: f64,
    ) -> Self {
        Self {
            trial_id: spec.trial_id.clone(),
            standing_id: spec.standing_id.clone(),
            facing_id: spec.facing_id.clone(),
            pointing_id: spec.pointing_id.clone(),
            response_angle_deg,
            correct_angle_deg,
            angular_error_deg,
            response_time_sec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_survey_field_names() {
        let spec = TrialSpec::new("1", "bell", "tree", "drum");
        let resp = TrialResponse::new(&spec, 120.0, 135.0, 15.0, 4.5);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["trialId"], "1");
        assert_eq!(json["standing"], "bell");
        assert_eq!(json["pointing"], "drum");
        assert_eq!(json["responseAngle"], 120.0);
        assert_eq!(json["angularError"], 15.0);
        assert_eq!(json["responseTime"], 4.5);
    }
}
