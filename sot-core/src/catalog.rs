//! Objects, their fixed layout, and the ordered practice/test trial lists.

use crate::error::{Error, Result};
use crate::scene::{ObjectPosition, SceneObject};
use crate::trial::TrialSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub objects: Vec<SceneObject>,
    pub positions: Vec<ObjectPosition>,
    pub practice_trials: Vec<TrialSpec>,
    pub test_trials: Vec<TrialSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Seven-object layout with 3 practice and 12 test items.
    pub fn standard() -> Self {
        let objects = [
            ("bell", "bell"),
            ("tree", "tree"),
            ("drum", "drum"),
            ("wheel", "wheel"),
            ("traffic-light", "traffic light"),
            ("trash-can", "trash can"),
            ("barrel", "barrel"),
        ]
        .into_iter()
        .map(|(id, name)| SceneObject::new(id, name))
        .collect();

        let positions = [
            ("wheel", 50.0, 20.0),
            ("traffic-light", 25.0, 35.0),
            ("barrel", 75.0, 40.0),
            ("trash-can", 20.0, 65.0),
            ("tree", 80.0, 80.0),
            ("drum", 50.0, 65.0),
            ("bell", 50.0, 50.0),
        ]
        .into_iter()
        .map(|(id, x, y)| ObjectPosition::new(id, x, y))
        .collect();

        let practice_trials = vec![
            TrialSpec::new("p1", "bell", "tree", "drum"),
            TrialSpec::new("p2", "tree", "bell", "trash-can"),
            TrialSpec::new("p3", "trash-can", "bell", "wheel"),
        ];

        let test_trials = vec![
            TrialSpec::new("1", "bell", "tree", "drum"),
            TrialSpec::new("2", "tree", "bell", "trash-can"),
            TrialSpec::new("3", "traffic-light", "drum", "trash-can"),
            TrialSpec::new("4", "barrel", "drum", "wheel"),
            TrialSpec::new("5", "barrel", "trash-can", "bell"),
            TrialSpec::new("6", "trash-can", "bell", "traffic-light"),
            TrialSpec::new("7", "wheel", "barrel", "traffic-light"),
            TrialSpec::new("8", "traffic-light", "bell", "wheel"),
            TrialSpec::new("9", "drum", "tree", "wheel"),
            TrialSpec::new("10", "drum", "trash-can", "barrel"),
            TrialSpec::new("11", "trash-can", "drum", "tree"),
            TrialSpec::new("12", "bell", "trash-can", "barrel"),
        ];

        Self {
            objects,
            positions,
            practice_trials,
            test_trials,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(catalog)
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn position(&self, id: &str) -> Result<&ObjectPosition> {
        self.positions
            .iter()
            .find(|p| p.object_id == id)
            .ok_or_else(|| Error::missing(id))
    }

    /// Display name for an object, or the id itself when it is unknown.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.object(id).map_or(id, |o| o.display_name.as_str())
    }

    pub fn check_trial(&self, trial: &TrialSpec) -> Result<()> {
        let [standing, facing, pointing] = trial.object_ids();
        if standing == facing || standing == pointing || facing == pointing {
            return Err(Error::InvalidTrial {
                trial_id: trial.trial_id.clone(),
                reason: "standing, facing and pointing objects must differ".into(),
            });
        }
        for id in trial.object_ids() {
            if self.object(id).is_none() {
                return Err(Error::missing(id));
            }
            self.position(id)?;
        }
        Ok(())
    }

    /// Checks every practice and test trial, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.practice_trials
            .iter()
            .chain(self.test_trials.iter())
            .try_for_each(|t| self.check_trial(t))
    }
}
