//! SwingScope Pose Model
//!
//! Defines the core data contracts for swing analysis:
//! - **Landmarks:** The 13 named body points tracked per frame
//! - **Angles:** Derived joint angles and rotation proxies for one frame
//! - **Sequence:** The ordered per-frame records of one analyzed video
//! - **Phases:** Canonical swing phases and the key-frame map
//! - **Detection:** Raw pose estimator output before validation
//! - **Track:** Video properties and the JSONL pose-track format
//!
//! Landmark `x`/`y` coordinates are normalized to `[0.0, 1.0]` relative to
//! the frame dimensions; `z` is the estimator's relative depth.

pub mod angles;
pub mod detection;
pub mod landmark;
pub mod phase;
pub mod sequence;
pub mod track;

pub use angles::*;
pub use detection::*;
pub use landmark::*;
pub use phase::*;
pub use sequence::*;
pub use track::*;
