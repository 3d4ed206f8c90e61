// EMC JobGen Ladder Modules
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod quality;
pub mod table;
pub mod tier;

pub use quality::{QualityBand, QualityThresholds};
pub use table::{derive_peak, LadderEntry, LadderTable, MAX_BITRATE, VP9_HEADROOM_PERCENT};
pub use tier::{tiers, ResolutionTier};
