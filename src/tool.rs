//! Connector tool state carried between interactions.
//!
//! Anchors accumulate one click at a time and are only handed out once the
//! mode's full set is captured. Taking them (or cancelling) clears the tool
//! in one step, so a fresh sequence always starts from nothing.

use crate::dye::ColorInputs;
use crate::geometry::*;
use crate::location::*;
use crate::resource::Color;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ToolUpgrades: u8 {
        const NONE = 0;
        /// Recolor connectors to the stored color without dye.
        const RECOLOR = 1;
    }
}

/// Where an anchor sequence stands after a click.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AnchorProgress {
    Pending { captured: usize, required: usize },
    Complete,
}

/// A full anchor set for one batch.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnchorSet {
    mode: PlacementMode,
    points: Vec<Position>,
}

impl AnchorSet {
    /// Returns `None` unless `points` is exactly what `mode` needs.
    pub fn new(mode: PlacementMode, points: Vec<Position>) -> Option<Self> {
        if mode.is_connector_mode() && points.len() == mode.required_anchors() {
            Some(AnchorSet { mode, points })
        } else {
            None
        }
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn candidates(&self) -> Vec<Position> {
        generate(&self.points, self.mode)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacementTool {
    mode: PlacementMode,
    anchors: Vec<Position>,
    selected_color: Color,
    upgrades: ToolUpgrades,
}

impl Default for PlacementTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementTool {
    pub fn new() -> Self {
        PlacementTool {
            mode: PlacementMode::Line,
            anchors: Vec::new(),
            selected_color: Color::Neutral,
            upgrades: ToolUpgrades::NONE,
        }
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn anchors(&self) -> &[Position] {
        &self.anchors
    }

    pub fn selected_color(&self) -> Color {
        self.selected_color
    }

    pub fn upgrades(&self) -> ToolUpgrades {
        self.upgrades
    }

    /// Switch modes. Captured anchors are dropped on an actual change.
    /// Returns false for modes this tool does not support.
    pub fn set_mode(&mut self, mode: PlacementMode) -> bool {
        if !mode.is_connector_mode() {
            return false;
        }
        if mode != self.mode {
            self.mode = mode;
            self.anchors.clear();
        }
        true
    }

    pub fn cycle_mode(&mut self) -> PlacementMode {
        let modes = PlacementMode::CONNECTOR_MODES;
        let index = modes.iter().position(|m| *m == self.mode).unwrap_or(0);
        self.set_mode(modes[(index + 1) % modes.len()]);
        self.mode
    }

    pub fn set_selected_color(&mut self, color: Color) {
        self.selected_color = color;
    }

    pub fn cycle_color(&mut self) -> Color {
        self.selected_color = self.selected_color.next();
        self.selected_color
    }

    pub fn install(&mut self, upgrades: ToolUpgrades) {
        self.upgrades.insert(upgrades);
    }

    pub fn remove(&mut self, upgrades: ToolUpgrades) {
        self.upgrades.remove(upgrades);
    }

    /// Capture one anchor. Clicks beyond a complete set are ignored until
    /// the set is taken or cancelled.
    pub fn push_anchor(&mut self, position: Position) -> AnchorProgress {
        let required = self.mode.required_anchors();
        if self.anchors.len() < required {
            self.anchors.push(position);
        }

        if self.anchors.len() >= required {
            AnchorProgress::Complete
        } else {
            AnchorProgress::Pending {
                captured: self.anchors.len(),
                required,
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.anchors.len() == self.mode.required_anchors()
    }

    /// Hand out the complete anchor set and clear the tool. A partial set
    /// stays where it is.
    pub fn take_ready(&mut self) -> Option<AnchorSet> {
        if !self.is_ready() {
            return None;
        }
        let points = std::mem::take(&mut self.anchors);
        AnchorSet::new(self.mode, points)
    }

    pub fn cancel(&mut self) {
        self.anchors.clear();
    }

    pub fn color_inputs(&self, held_dye: Option<Color>) -> ColorInputs {
        ColorInputs {
            held_dye,
            upgrade_installed: self.upgrades.contains(ToolUpgrades::RECOLOR),
            selected: self.selected_color,
        }
    }

    /// Candidates to render if `cursor` were the next anchor. Empty unless
    /// the anchors plus the cursor make a full set.
    pub fn preview(&self, cursor: Option<Position>) -> Vec<Position> {
        let mut points = self.anchors.clone();
        if let Some(cursor) = cursor {
            if points.len() < self.mode.required_anchors() {
                points.push(cursor);
            }
        }
        generate(&points, self.mode)
    }
}
