//! Structural checks on a save document before it is trusted as a record.

use macan_run_core::{SaveRecord, SaveValidationError, LEVEL_PREFIX};
use serde_json::{Map, Value};

const REQUIRED_KEYS: [&str; 4] = ["level", "score", "coins", "player"];
const PLAYER_KEYS: [(&str, &str); 3] = [
    ("x", "player.x"),
    ("y", "player.y"),
    ("health", "player.health"),
];

/// Verifies required keys, their JSON types and the level name, in that
/// order, reporting the first rule that fails.
pub(crate) fn check(document: &Value) -> Result<(), SaveValidationError> {
    let Some(root) = document.as_object() else {
        return Err(SaveValidationError::InvalidType("document"));
    };

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(SaveValidationError::MissingKey(key));
        }
    }

    let Some(player) = root.get("player").and_then(Value::as_object) else {
        return Err(SaveValidationError::InvalidType("player"));
    };
    for (key, label) in PLAYER_KEYS {
        if !player.contains_key(key) {
            return Err(SaveValidationError::MissingKey(label));
        }
    }

    let level = match root.get("level") {
        Some(Value::String(level)) => level,
        _ => return Err(SaveValidationError::InvalidType("level")),
    };
    if !level.starts_with(LEVEL_PREFIX) {
        return Err(SaveValidationError::InvalidLevel(level.clone()));
    }

    check_types(root, player)
}

fn check_types(
    root: &Map<String, Value>,
    player: &Map<String, Value>,
) -> Result<(), SaveValidationError> {
    if root.get("score").and_then(Value::as_u64).is_none() {
        return Err(SaveValidationError::InvalidType("score"));
    }
    let coins_fit = root
        .get("coins")
        .and_then(Value::as_u64)
        .is_some_and(|coins| u32::try_from(coins).is_ok());
    if !coins_fit {
        return Err(SaveValidationError::InvalidType("coins"));
    }
    for (key, label) in [("x", "player.x"), ("y", "player.y")] {
        if !player.get(key).is_some_and(Value::is_number) {
            return Err(SaveValidationError::InvalidType(label));
        }
    }
    let health_fits = player
        .get("health")
        .and_then(Value::as_i64)
        .is_some_and(|health| i32::try_from(health).is_ok());
    if !health_fits {
        return Err(SaveValidationError::InvalidType("player.health"));
    }
    for key in ["timestamp", "version"] {
        if root
            .get(key)
            .is_some_and(|value| !(value.is_string() || value.is_null()))
        {
            return Err(SaveValidationError::InvalidType(key));
        }
    }
    Ok(())
}

/// Outcome of decoding save text.
#[derive(Debug)]
pub(crate) enum DecodeError {
    Json(serde_json::Error),
    Invalid(SaveValidationError),
}

/// Parses and validates save text into a record.
pub(crate) fn decode(text: &str) -> Result<SaveRecord, DecodeError> {
    let document: Value = serde_json::from_str(text).map_err(DecodeError::Json)?;
    check(&document).map_err(DecodeError::Invalid)?;
    serde_json::from_value(document).map_err(DecodeError::Json)
}
