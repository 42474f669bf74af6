//! Deterministic in-memory engine used by the test suite.
//!
//! Models the engine's data surface (typed named objects with scalar and
//! indexed properties) without any physics. Artifacts persist as canonical
//! JSON with stable key order, so tests can compare persisted states
//! byte-for-byte. Result channels default to values derived from a stable
//! hash of the channel key and can be pinned per channel.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    Engine, EngineError, Extrema, ExtremeTail, LineEnd, ObjectKind, PropertyValue, RayleighQuery,
    ENVIRONMENT, GENERAL,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ObjectState {
    kind: String,
    scalars: BTreeMap<String, PropertyValue>,
    arrays: BTreeMap<String, BTreeMap<usize, PropertyValue>>,
}

impl ObjectState {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            scalars: BTreeMap::new(),
            arrays: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedState {
    statics_solved: bool,
    objects: BTreeMap<String, ObjectState>,
}

type ChannelKey = (String, String, Option<LineEnd>);

#[derive(Default)]
pub struct MockEngine {
    objects: BTreeMap<String, ObjectState>,
    statics_solved: bool,
    statics_solve_count: u32,
    line_setup_runs: u32,
    wizard_invocations: Vec<String>,
    static_results: HashMap<ChannelKey, f64>,
    channel_levels: HashMap<ChannelKey, f64>,
}

impl MockEngine {
    pub fn new() -> Self {
        let mut engine = Self::default();
        engine.install_pseudo_objects();
        engine
    }

    fn install_pseudo_objects(&mut self) {
        self.objects
            .insert(GENERAL.to_string(), ObjectState::new(GENERAL));
        self.objects
            .insert(ENVIRONMENT.to_string(), ObjectState::new(ENVIRONMENT));
    }

    /// Pin the static result for one channel.
    pub fn set_static_result(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
        value: f64,
    ) {
        self.static_results
            .insert((object.to_string(), variable.to_string(), end), value);
    }

    /// Pin the level a channel's dynamic statistics are derived from.
    pub fn set_channel_level(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
        value: f64,
    ) {
        self.channel_levels
            .insert((object.to_string(), variable.to_string(), end), value);
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn scalar(&self, object: &str, property: &str) -> Option<&PropertyValue> {
        self.objects.get(object)?.scalars.get(property)
    }

    pub fn indexed(&self, object: &str, property: &str, index: usize) -> Option<&PropertyValue> {
        self.objects.get(object)?.arrays.get(property)?.get(&index)
    }

    pub fn wizard_invocations(&self) -> &[String] {
        &self.wizard_invocations
    }

    pub fn line_setup_runs(&self) -> u32 {
        self.line_setup_runs
    }

    pub fn statics_solve_count(&self) -> u32 {
        self.statics_solve_count
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut ObjectState, EngineError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownObject(name.to_string()))
    }

    fn require_object(&self, name: &str) -> Result<(), EngineError> {
        if self.objects.contains_key(name) {
            Ok(())
        } else {
            Err(EngineError::UnknownObject(name.to_string()))
        }
    }

    fn channel_level(&self, object: &str, variable: &str, end: Option<LineEnd>) -> f64 {
        let key = (object.to_string(), variable.to_string(), end);
        self.channel_levels
            .get(&key)
            .copied()
            .unwrap_or_else(|| derived_level(object, variable, end))
    }
}

/// Stable pseudo-level in [-1000, 1000] so unscripted channels still
/// produce distinct finite statistics.
fn derived_level(object: &str, variable: &str, end: Option<LineEnd>) -> f64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    let end_tag = match end {
        Some(LineEnd::EndA) => "A",
        Some(LineEnd::EndB) => "B",
        None => "-",
    };
    for byte in object
        .bytes()
        .chain("|".bytes())
        .chain(variable.bytes())
        .chain("|".bytes())
        .chain(end_tag.bytes())
    {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    ((hash % 200_001) as f64) / 100.0 - 1000.0
}

impl Engine for MockEngine {
    fn reset(&mut self) -> Result<(), EngineError> {
        self.objects.clear();
        self.install_pseudo_objects();
        self.statics_solved = false;
        Ok(())
    }

    fn load_simulation(&mut self, path: &Path) -> Result<(), EngineError> {
        let raw = fs::read_to_string(path)?;
        let state: SavedState = serde_json::from_str(&raw).map_err(|err| {
            EngineError::Protocol(format!("unreadable artifact '{}': {err}", path.display()))
        })?;
        self.objects = state.objects;
        self.statics_solved = state.statics_solved;
        Ok(())
    }

    fn save_model(&mut self, path: &Path) -> Result<(), EngineError> {
        self.save_simulation(path)
    }

    fn save_simulation(&mut self, path: &Path) -> Result<(), EngineError> {
        let state = SavedState {
            statics_solved: self.statics_solved,
            objects: self.objects.clone(),
        };
        let payload = serde_json::to_string_pretty(&state)
            .map_err(|err| EngineError::Protocol(format!("unencodable artifact: {err}")))?;
        fs::write(path, payload)?;
        Ok(())
    }

    fn create_object(&mut self, kind: ObjectKind, name: &str) -> Result<(), EngineError> {
        if self.objects.contains_key(name) {
            return Err(EngineError::Operation {
                op: "create_object".to_string(),
                message: format!("object '{name}' already exists"),
            });
        }
        self.objects
            .insert(name.to_string(), ObjectState::new(kind.as_str()));
        Ok(())
    }

    fn destroy_object(&mut self, name: &str) -> Result<(), EngineError> {
        self.objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::UnknownObject(name.to_string()))
    }

    fn set_property(
        &mut self,
        object: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        self.object_mut(object)?
            .scalars
            .insert(property.to_string(), value);
        Ok(())
    }

    fn set_property_at(
        &mut self,
        object: &str,
        property: &str,
        index: usize,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        self.object_mut(object)?
            .arrays
            .entry(property.to_string())
            .or_default()
            .insert(index, value);
        Ok(())
    }

    fn invoke_wizard(&mut self, object: &str) -> Result<(), EngineError> {
        self.require_object(object)?;
        self.wizard_invocations.push(object.to_string());
        Ok(())
    }

    fn run_line_setup(&mut self) -> Result<(), EngineError> {
        self.line_setup_runs += 1;
        Ok(())
    }

    fn solve_statics(&mut self) -> Result<(), EngineError> {
        self.statics_solved = true;
        self.statics_solve_count += 1;
        Ok(())
    }

    fn static_result(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError> {
        self.require_object(object)?;
        if !self.statics_solved {
            return Err(EngineError::Operation {
                op: "static_result".to_string(),
                message: "statics have not been solved".to_string(),
            });
        }
        let key = (object.to_string(), variable.to_string(), end);
        Ok(self
            .static_results
            .get(&key)
            .copied()
            .unwrap_or_else(|| self.channel_level(object, variable, end)))
    }

    fn most_probable_extreme(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
        query: RayleighQuery,
    ) -> Result<f64, EngineError> {
        self.require_object(object)?;
        let level = self.channel_level(object, variable, end);
        let spread = 12.0 * query.storm_duration_hours.max(0.0).sqrt() * query.risk_factor;
        Ok(match query.tail {
            ExtremeTail::Upper => level + spread,
            ExtremeTail::Lower => level - spread,
        })
    }

    fn extrema(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<Extrema, EngineError> {
        self.require_object(object)?;
        let level = self.channel_level(object, variable, end);
        Ok(Extrema {
            max: level + 8.0,
            min: level - 8.0,
        })
    }

    fn rms(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError> {
        self.require_object(object)?;
        let level = self.channel_level(object, variable, end);
        Ok(level.abs() * 0.3 + 0.5)
    }
}
