//! Count-driven gallery layout selection.

use pm_common::EvidenceImage;
use serde::{Deserialize, Serialize};

/// Number of images a grid shows before overflowing.
pub const GRID_CAPACITY: usize = 4;

/// Visual arrangement for one list of evidence images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum LayoutPlan {
    /// "No evidence" placeholder.
    Empty,
    /// One large centered image.
    Single { image: EvidenceImage },
    /// Two images side by side; captions are suppressed.
    SideBySide { images: [EvidenceImage; 2] },
    /// One large image above a row of two.
    HeroWithPair {
        hero: EvidenceImage,
        pair: [EvidenceImage; 2],
    },
    /// 2×2 grid of the first four, plus the number left out.
    Grid {
        images: [EvidenceImage; GRID_CAPACITY],
        overflow: usize,
    },
}

/// Pick the layout for a list of images.
pub fn select_layout(images: &[EvidenceImage]) -> LayoutPlan {
    match images {
        [] => LayoutPlan::Empty,
        [image] => LayoutPlan::Single {
            image: image.clone(),
        },
        [a, b] => LayoutPlan::SideBySide {
            images: [a.clone(), b.clone()],
        },
        [hero, a, b] => LayoutPlan::HeroWithPair {
            hero: hero.clone(),
            pair: [a.clone(), b.clone()],
        },
        [a, b, c, d, rest @ ..] => LayoutPlan::Grid {
            images: [a.clone(), b.clone(), c.clone(), d.clone()],
            overflow: rest.len(),
        },
    }
}

impl LayoutPlan {
    /// Images actually shown, in display order.
    pub fn shown(&self) -> Vec<&EvidenceImage> {
        match self {
            LayoutPlan::Empty => Vec::new(),
            LayoutPlan::Single { image } => vec![image],
            LayoutPlan::SideBySide { images } => images.iter().collect(),
            LayoutPlan::HeroWithPair { hero, pair } => {
                std::iter::once(hero).chain(pair.iter()).collect()
            }
            LayoutPlan::Grid { images, .. } => images.iter().collect(),
        }
    }

    /// Images left out of the grid.
    pub fn overflow(&self) -> usize {
        match self {
            LayoutPlan::Grid { overflow, .. } => *overflow,
            _ => 0,
        }
    }

    /// `+ N more image(s)` when anything overflowed.
    pub fn overflow_caption(&self) -> Option<String> {
        match self.overflow() {
            0 => None,
            1 => Some("+ 1 more image".to_string()),
            n => Some(format!("+ {} more images", n)),
        }
    }

    /// Whether captions are rendered under each image.
    pub fn shows_captions(&self) -> bool {
        !matches!(self, LayoutPlan::SideBySide { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LayoutPlan::Empty)
    }

    /// Short name used as a CSS class.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutPlan::Empty => "empty",
            LayoutPlan::Single { .. } => "single",
            LayoutPlan::SideBySide { .. } => "side-by-side",
            LayoutPlan::HeroWithPair { .. } => "hero-with-pair",
            LayoutPlan::Grid { .. } => "grid",
        }
    }
}
