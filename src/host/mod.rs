//! Host game interfaces
//!
//! Contracts between the affix engine and the host simulation. The engine
//! only reads wealth/quality/equip signals through these traits and writes
//! effects back through [`EffectSink`]; it never touches host state directly.

use serde::{Deserialize, Serialize};

/// Opaque pawn handle owned by the host.
pub type PawnId = u64;

/// Item quality tiers, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Normal,
    Good,
    Excellent,
    Masterwork,
    Legendary,
}

impl Quality {
    /// Numeric rank used by the budget formula (rank squared / 4.5 yields
    /// roughly 1/2/4/6/8 points across the five tiers).
    pub fn rank(&self) -> u32 {
        match self {
            Quality::Normal => 2,
            Quality::Good => 3,
            Quality::Excellent => 4,
            Quality::Masterwork => 5,
            Quality::Legendary => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quality::Normal => "Normal",
            Quality::Good => "Good",
            Quality::Excellent => "Excellent",
            Quality::Masterwork => "Masterwork",
            Quality::Legendary => "Legendary",
        }
    }
}

/// Technology tier of an item's base definition. Projectile swaps only
/// make sense on industrial-or-better ranged weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechLevel {
    Neolithic,
    Medieval,
    Industrial,
    Spacer,
}

/// Read-only queries the engine makes against the host simulation.
///
/// `wealth()` should return the best-available wealth metric in the host's
/// preferred fallback order (item's map, then current map, then world) and
/// `None` when no wealth source exists yet.
pub trait HostContext {
    /// Whether the game is in a live, playing state. Generation during
    /// world init sees zero wealth.
    fn is_live(&self) -> bool;

    /// Best-available wealth signal, if any.
    fn wealth(&self) -> Option<f32>;
}

/// View of the pawn currently holding or wearing an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PawnView {
    pub id: PawnId,
    pub alive: bool,
    pub player_faction: bool,
}

/// Outbound notification raised by the engine for the host's UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A pawn equipped an item carrying a negative deadly affix.
    CursedItem {
        pawn: PawnId,
        item_label: String,
        affix_label: String,
        report: String,
    },
}

/// Write-effects the engine may apply to the host world. Periodic
/// activations and warning letters land here.
pub trait EffectSink {
    fn hurt_pawn(&mut self, pawn: PawnId, amount: f32);
    fn teleport_pawn(&mut self, pawn: PawnId);
    fn kill_pawn(&mut self, pawn: PawnId);
    fn notify(&mut self, notice: Notice);
}

/// Host context for tests and tools: fixed wealth, always live.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedHost {
    pub live: bool,
    pub wealth: Option<f32>,
}

impl FixedHost {
    pub fn live(wealth: f32) -> Self {
        Self { live: true, wealth: Some(wealth) }
    }
}

impl HostContext for FixedHost {
    fn is_live(&self) -> bool {
        self.live
    }

    fn wealth(&self) -> Option<f32> {
        self.wealth
    }
}

/// Effect sink that records everything it receives. Used by tests and as
/// a template for host adapters.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub damage: Vec<(PawnId, f32)>,
    pub teleports: Vec<PawnId>,
    pub kills: Vec<PawnId>,
    pub notices: Vec<Notice>,
}

impl EffectSink for RecordingSink {
    fn hurt_pawn(&mut self, pawn: PawnId, amount: f32) {
        self.damage.push((pawn, amount));
    }

    fn teleport_pawn(&mut self, pawn: PawnId) {
        self.teleports.push(pawn);
    }

    fn kill_pawn(&mut self, pawn: PawnId) {
        self.kills.push(pawn);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
