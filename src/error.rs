//! Error types shared across the tracker

use crate::state::data::SLOT_COUNT;
use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tracking or exporting a mission
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Serialized state could not be read or written
    #[error("State serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The user data directory could not be determined
    #[error("Could not determine the user data directory")]
    NoDataDir,

    /// Slot id outside the valid range
    #[error("Slot {0} is invalid; slots are numbered 1..={SLOT_COUNT}")]
    InvalidSlot(u32),

    /// Slot has no photo to remove
    #[error("Slot {0} is empty")]
    EmptySlot(u32),

    /// Operation requires a registered participant
    #[error("No registered participant; run `register` first")]
    NotRegistered,

    /// Registration happens once per session
    #[error("A participant is already registered; `reset` to start over")]
    AlreadyRegistered,

    /// Mutating operations are rejected after submission
    #[error("Mission already submitted; `reset` to start over")]
    AlreadySubmitted,

    /// Submission requires the completion threshold
    #[error("Need at least {required} photos to submit, have {have}")]
    BelowThreshold { required: u32, have: u32 },

    /// Export requires a submitted mission
    #[error("Mission not submitted yet; run `submit` first")]
    NotSubmitted,

    /// Stored session phase tag is not one of the known tags
    #[error("Unknown session phase tag: {0}")]
    InvalidPhase(String),

    /// No usable font for the collage text overlay
    #[error("No usable TTF font found; set SNAPHUNT_FONT to a font file")]
    FontUnavailable,

    /// Collage composition failure
    #[error("Rendering failed: {0}")]
    Render(String),
}
