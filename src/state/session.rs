/// The in-memory session owned by the top-level controller
///
/// Holds the registered identity, the gallery, and the lifecycle
/// phase, and enforces the lifecycle rules. Persistence is explicit:
/// the controller loads once at startup and saves after a mutation.
use super::data::{Gallery, Identity, ImageSlot, SessionPhase, REQUIRED_SLOTS};
use super::store::Store;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    pub gallery: Gallery,
    pub phase: SessionPhase,
}

impl Session {
    /// Load the whole session from the store
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Session {
            identity: store.load_identity()?,
            gallery: store.load_gallery()?,
            phase: store.load_phase()?,
        })
    }

    /// Write the whole session back to the store
    pub fn save(&self, store: &Store) -> Result<()> {
        if let Some(identity) = &self.identity {
            store.save_identity(identity)?;
        }
        store.save_gallery(&self.gallery)?;
        store.save_phase(self.phase)
    }

    /// Register the participant and start playing
    pub fn register(&mut self, identity: Identity) -> Result<()> {
        match self.phase {
            SessionPhase::Register => {
                self.identity = Some(identity);
                self.phase = SessionPhase::Playing;
                Ok(())
            }
            SessionPhase::Playing => Err(Error::AlreadyRegistered),
            SessionPhase::Completed => Err(Error::AlreadySubmitted),
        }
    }

    fn require_playing(&self) -> Result<()> {
        match self.phase {
            SessionPhase::Register => Err(Error::NotRegistered),
            SessionPhase::Completed => Err(Error::AlreadySubmitted),
            SessionPhase::Playing => Ok(()),
        }
    }

    /// Put a photo into a slot, replacing any photo already there
    pub fn add_photo(&mut self, slot: ImageSlot) -> Result<()> {
        self.require_playing()?;
        self.gallery.insert(slot)
    }

    /// Clear a slot
    pub fn remove_photo(&mut self, slot_id: u32) -> Result<ImageSlot> {
        self.require_playing()?;
        self.gallery.remove(slot_id)
    }

    /// Submit the mission; requires the completion threshold
    pub fn submit(&mut self) -> Result<()> {
        self.require_playing()?;
        let have = self.gallery.len();
        if have < REQUIRED_SLOTS {
            return Err(Error::BelowThreshold {
                required: REQUIRED_SLOTS,
                have,
            });
        }
        self.phase = SessionPhase::Completed;
        Ok(())
    }

    /// Drop everything and return to registration
    pub fn reset(&mut self, store: &Store) -> Result<()> {
        store.reset()?;
        *self = Session::default();
        Ok(())
    }

    /// Number of filled slots
    pub fn filled(&self) -> u32 {
        self.gallery.len()
    }

    /// Slots still needed to reach the completion threshold
    pub fn remaining(&self) -> u32 {
        REQUIRED_SLOTS.saturating_sub(self.gallery.len())
    }

    /// Whether the completion threshold has been reached
    pub fn is_complete(&self) -> bool {
        self.gallery.len() >= REQUIRED_SLOTS
    }
}
