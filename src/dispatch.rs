//! Method-name dispatch over the contract stores.
//!
//! Every call answers with an [`Envelope`]: `{"success": true, "value": ..}`
//! on success, `{"success": false, "error": ..}` otherwise. The error is
//! `404` for a missing record, `400` for malformed arguments and the string
//! `"Unknown method"` for a method the contract does not expose.

use crate::ledger::entry::{RealityId, RecordId};
use crate::ledger::idea_evolution::IdeaStore;
use crate::ledger::memetic_resilience::MemeStore;
use crate::ledger::LedgerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const BAD_REQUEST_CODE: u16 = 400;
pub const UNKNOWN_METHOD: &str = "Unknown method";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorValue {
    Code(u16),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorValue>,
}

impl Envelope {
    pub fn ok(value: Value) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    /// Success with nothing to return
    pub fn done() -> Self {
        Self {
            success: true,
            value: None,
            error: None,
        }
    }

    pub fn failure(error: ErrorValue) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error),
        }
    }

    fn from_serializable<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::ok(value),
            Err(e) => Self::failure(ErrorValue::Message(e.to_string())),
        }
    }
}

impl From<LedgerError> for Envelope {
    fn from(err: LedgerError) -> Self {
        Self::failure(ErrorValue::Code(err.code()))
    }
}

#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("argument {index} of {method}: expected {expected}")]
    Argument {
        method: String,
        index: usize,
        expected: &'static str,
    },
    #[error("unknown method {0}")]
    UnknownMethod(String),
}

impl CallError {
    pub fn error_value(&self) -> ErrorValue {
        match self {
            CallError::Ledger(err) => ErrorValue::Code(err.code()),
            CallError::Argument { .. } => ErrorValue::Code(BAD_REQUEST_CODE),
            CallError::UnknownMethod(_) => ErrorValue::Message(UNKNOWN_METHOD.to_string()),
        }
    }
}

/// Positional arguments of a single call
struct Args<'a> {
    method: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn invalid(&self, index: usize, expected: &'static str) -> CallError {
        CallError::Argument {
            method: self.method.to_string(),
            index,
            expected,
        }
    }

    fn text(&self, index: usize) -> Result<&'a str, CallError> {
        self.values
            .get(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.invalid(index, "string"))
    }

    fn uint(&self, index: usize) -> Result<u64, CallError> {
        self.values
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.invalid(index, "unsigned integer"))
    }

    fn id(&self, index: usize) -> Result<RecordId, CallError> {
        self.uint(index)
    }

    /// Any value names a reality; strings are taken verbatim, a missing
    /// argument or null is the empty label.
    fn reality(&self, index: usize) -> RealityId {
        match self.values.get(index) {
            None | Some(Value::Null) => RealityId::default(),
            Some(Value::String(label)) => RealityId::from(label.as_str()),
            Some(other) => RealityId::from(other.to_string()),
        }
    }
}

/// A contract reachable by method name.
pub trait Contract {
    /// Runs `method`, returning the typed failure instead of an envelope.
    fn try_call(&mut self, method: &str, args: &[Value]) -> Result<Envelope, CallError>;

    fn call(&mut self, method: &str, args: &[Value]) -> Envelope {
        match self.try_call(method, args) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(method, error = %err, "contract call failed");
                Envelope::failure(err.error_value())
            }
        }
    }
}

impl Contract for IdeaStore {
    fn try_call(&mut self, method: &str, args: &[Value]) -> Result<Envelope, CallError> {
        let args = Args { method, values: args };
        match method {
            "create-idea" => {
                let id = self.create_idea(args.text(0)?, args.uint(1)?, args.uint(2)?);
                Ok(Envelope::ok(Value::from(id)))
            }
            "mutate-idea" => {
                self.mutate_idea(args.id(0)?, args.text(1)?)?;
                Ok(Envelope::done())
            }
            "get-idea" => Ok(Envelope::from_serializable(self.get_idea(args.id(0)?)?)),
            "calculate-evolution-score" => {
                let score = self.calculate_evolution_score(args.id(0)?)?;
                Ok(Envelope::ok(Value::from(score)))
            }
            other => Err(CallError::UnknownMethod(other.to_string())),
        }
    }
}

impl Contract for MemeStore {
    fn try_call(&mut self, method: &str, args: &[Value]) -> Result<Envelope, CallError> {
        let args = Args { method, values: args };
        match method {
            "create-meme" => {
                let id = self.create_meme(args.text(0)?, args.uint(1)?);
                Ok(Envelope::ok(Value::from(id)))
            }
            "reinforce-meme" => {
                self.reinforce_meme(args.id(0)?)?;
                Ok(Envelope::done())
            }
            "get-meme" => Ok(Envelope::from_serializable(self.get_meme(args.id(0)?)?)),
            "calculate-meme-strength" => {
                let strength = self.calculate_meme_strength(args.id(0)?)?;
                Ok(Envelope::ok(Value::from(strength)))
            }
            "transfer-meme-across-realities" => {
                let moved = self.transfer_meme_across_realities(args.id(0)?, args.reality(1))?;
                Ok(Envelope::ok(Value::Bool(moved)))
            }
            other => Err(CallError::UnknownMethod(other.to_string())),
        }
    }
}
