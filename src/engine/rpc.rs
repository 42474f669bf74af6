//! Bridge to an external engine adapter process.
//!
//! The adapter command comes from the `SPREADMOOR_ENGINE` environment
//! variable and is spawned once per phase. The wire protocol is one JSON
//! request per line on the adapter's stdin and one JSON response per line on
//! its stdout, answered in order:
//!
//! ```text
//! -> {"id":1,"op":"create_object","params":{"kind":"Line","name":"ML1"}}
//! <- {"id":1,"ok":true}
//! -> {"id":2,"op":"static_result","params":{"object":"ML1","variable":"Effective Tension","end":"End A"}}
//! <- {"id":2,"ok":true,"value":1234.5}
//! ```
//!
//! The adapter owns the actual engine session; this side only marshals
//! capability calls and surfaces engine failures as [`EngineError`].

use std::env;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{
    Engine, EngineError, Extrema, ExtremeTail, LineEnd, ObjectKind, PropertyValue, RayleighQuery,
};

/// Environment variable holding the adapter command line.
pub const ENGINE_COMMAND_VAR: &str = "SPREADMOOR_ENGINE";

#[derive(Debug, Serialize)]
struct Request<'a> {
    id: u64,
    op: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

pub struct RpcEngine {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl RpcEngine {
    /// Spawn the adapter named by `SPREADMOOR_ENGINE`.
    pub fn from_env() -> Result<Self, EngineError> {
        let command = env::var(ENGINE_COMMAND_VAR).map_err(|_| {
            EngineError::Protocol(format!(
                "{ENGINE_COMMAND_VAR} is not set; expected the command that starts the engine adapter"
            ))
        })?;
        Self::spawn(&command)
    }

    /// Spawn an adapter from a whitespace-separated command line.
    pub fn spawn(command: &str) -> Result<Self, EngineError> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            EngineError::Protocol("engine adapter command is empty".to_string())
        })?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("adapter stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("adapter stdout unavailable".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        })
    }

    fn call(&mut self, op: &str, params: Value) -> Result<Value, EngineError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = Request { id, op, params };
        let line = serde_json::to_string(&request)
            .map_err(|err| EngineError::Protocol(format!("unencodable request: {err}")))?;
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;

        let mut reply = String::new();
        let read = self.stdout.read_line(&mut reply)?;
        if read == 0 {
            return Err(EngineError::Protocol(format!(
                "adapter closed the stream during '{op}'"
            )));
        }

        let response: Response = serde_json::from_str(reply.trim_end())
            .map_err(|err| EngineError::Protocol(format!("undecodable response: {err}")))?;
        if response.id != id {
            return Err(EngineError::Protocol(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }
        if !response.ok {
            return Err(EngineError::Operation {
                op: op.to_string(),
                message: response.error.unwrap_or_else(|| "unspecified failure".to_string()),
            });
        }
        Ok(response.value)
    }

    fn call_number(&mut self, op: &str, params: Value) -> Result<f64, EngineError> {
        let value = self.call(op, params)?;
        value
            .as_f64()
            .ok_or_else(|| EngineError::Protocol(format!("'{op}' returned a non-numeric value")))
    }

    fn path_param(path: &Path) -> Value {
        Value::String(path.to_string_lossy().into_owned())
    }

    fn end_param(end: Option<LineEnd>) -> Value {
        match end {
            Some(end) => Value::String(end.as_str().to_string()),
            None => Value::Null,
        }
    }
}

impl Drop for RpcEngine {
    fn drop(&mut self) {
        // Best effort: ask the adapter to exit, then reap it.
        let _ = writeln!(self.stdin, r#"{{"id":0,"op":"shutdown","params":null}}"#);
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

impl Engine for RpcEngine {
    fn reset(&mut self) -> Result<(), EngineError> {
        self.call("reset", Value::Null).map(|_| ())
    }

    fn load_simulation(&mut self, path: &Path) -> Result<(), EngineError> {
        self.call("load_simulation", json!({ "path": Self::path_param(path) }))
            .map(|_| ())
    }

    fn save_model(&mut self, path: &Path) -> Result<(), EngineError> {
        self.call("save_model", json!({ "path": Self::path_param(path) }))
            .map(|_| ())
    }

    fn save_simulation(&mut self, path: &Path) -> Result<(), EngineError> {
        self.call("save_simulation", json!({ "path": Self::path_param(path) }))
            .map(|_| ())
    }

    fn create_object(&mut self, kind: ObjectKind, name: &str) -> Result<(), EngineError> {
        self.call(
            "create_object",
            json!({ "kind": kind.as_str(), "name": name }),
        )
        .map(|_| ())
    }

    fn destroy_object(&mut self, name: &str) -> Result<(), EngineError> {
        self.call("destroy_object", json!({ "name": name })).map(|_| ())
    }

    fn set_property(
        &mut self,
        object: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        self.call(
            "set_property",
            json!({ "object": object, "property": property, "value": value }),
        )
        .map(|_| ())
    }

    fn set_property_at(
        &mut self,
        object: &str,
        property: &str,
        index: usize,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        self.call(
            "set_property_at",
            json!({ "object": object, "property": property, "index": index, "value": value }),
        )
        .map(|_| ())
    }

    fn invoke_wizard(&mut self, object: &str) -> Result<(), EngineError> {
        self.call("invoke_wizard", json!({ "object": object })).map(|_| ())
    }

    fn run_line_setup(&mut self) -> Result<(), EngineError> {
        self.call("run_line_setup", Value::Null).map(|_| ())
    }

    fn solve_statics(&mut self) -> Result<(), EngineError> {
        self.call("solve_statics", Value::Null).map(|_| ())
    }

    fn static_result(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError> {
        self.call_number(
            "static_result",
            json!({ "object": object, "variable": variable, "end": Self::end_param(end) }),
        )
    }

    fn most_probable_extreme(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
        query: RayleighQuery,
    ) -> Result<f64, EngineError> {
        let tail = match query.tail {
            ExtremeTail::Upper => "upper",
            ExtremeTail::Lower => "lower",
        };
        self.call_number(
            "most_probable_extreme",
            json!({
                "object": object,
                "variable": variable,
                "end": Self::end_param(end),
                "tail": tail,
                "storm_duration_hours": query.storm_duration_hours,
                "risk_factor": query.risk_factor,
            }),
        )
    }

    fn extrema(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<Extrema, EngineError> {
        let value = self.call(
            "extrema",
            json!({ "object": object, "variable": variable, "end": Self::end_param(end) }),
        )?;
        let max = value.get("max").and_then(Value::as_f64);
        let min = value.get("min").and_then(Value::as_f64);
        match (max, min) {
            (Some(max), Some(min)) => Ok(Extrema { max, min }),
            _ => Err(EngineError::Protocol(
                "'extrema' returned an object without numeric max/min".to_string(),
            )),
        }
    }

    fn rms(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError> {
        self.call_number(
            "rms",
            json!({ "object": object, "variable": variable, "end": Self::end_param(end) }),
        )
    }
}
