/// Shared data structures for the session state
///
/// These structs represent the data model that flows between
/// the key-value store and the command surface, and into the
/// collage renderer.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Total number of photo slots on the board
pub const SLOT_COUNT: u32 = 20;

/// Minimum filled slots required to submit the mission
pub const REQUIRED_SLOTS: u32 = 10;

/// Participant gender tag (display-only)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// The registered participant
///
/// Captured once at registration and immutable for the rest of the
/// session; used only for display and for labeling the exported collage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub given_name: String,
    pub family_name: String,
    pub age: u32,
    pub gender: Gender,
}

impl Identity {
    /// Full display name, as it appears on the certificate
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// One filled photo slot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    /// Slot number, 1..=SLOT_COUNT
    pub slot_id: u32,
    /// Re-encoded JPEG bytes, stored as base64 text in the kv store
    #[serde(with = "jpeg_b64")]
    pub jpeg_data: Vec<u8>,
    /// Unix timestamp of when the photo was ingested
    pub captured_at: i64,
}

/// The set of currently filled slots, keyed by slot id
///
/// Iteration order is ascending by slot id, which is also the order
/// slots are placed in the collage grid.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Gallery(BTreeMap<u32, ImageSlot>);

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filled slots
    pub fn len(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, slot_id: u32) -> bool {
        self.0.contains_key(&slot_id)
    }

    pub fn get(&self, slot_id: u32) -> Option<&ImageSlot> {
        self.0.get(&slot_id)
    }

    /// Insert a slot, replacing any photo already in it.
    /// Slot ids outside 1..=SLOT_COUNT are rejected.
    pub fn insert(&mut self, slot: ImageSlot) -> Result<()> {
        if slot.slot_id < 1 || slot.slot_id > SLOT_COUNT {
            return Err(Error::InvalidSlot(slot.slot_id));
        }
        self.0.insert(slot.slot_id, slot);
        Ok(())
    }

    /// Remove a slot's photo, if present
    pub fn remove(&mut self, slot_id: u32) -> Result<ImageSlot> {
        if slot_id < 1 || slot_id > SLOT_COUNT {
            return Err(Error::InvalidSlot(slot_id));
        }
        self.0.remove(&slot_id).ok_or(Error::EmptySlot(slot_id))
    }

    /// Filled slots in ascending slot-id order
    pub fn iter(&self) -> impl Iterator<Item = &ImageSlot> {
        self.0.values()
    }

    /// Filled slot ids in ascending order
    pub fn slot_ids(&self) -> Vec<u32> {
        self.0.keys().copied().collect()
    }

    /// Lowest unfilled slot id, if the board is not full
    pub fn first_free_slot(&self) -> Option<u32> {
        (1..=SLOT_COUNT).find(|id| !self.0.contains_key(id))
    }
}

/// Session lifecycle tag, persisted verbatim as the state key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Register,
    Playing,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SessionPhase::Register => "REGISTER",
            SessionPhase::Playing => "PLAYING",
            SessionPhase::Completed => "COMPLETED",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for SessionPhase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "REGISTER" => Ok(SessionPhase::Register),
            "PLAYING" => Ok(SessionPhase::Playing),
            "COMPLETED" => Ok(SessionPhase::Completed),
            other => Err(Error::InvalidPhase(other.to_string())),
        }
    }
}

/// Serde adapter storing image bytes as base64 text, so the serialized
/// gallery stays a plain-text JSON document in the kv store.
mod jpeg_b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(de)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
