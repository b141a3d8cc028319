//! # Hero Studio - Brand-Locked Hero Visuals
//!
//! Hero Studio composes square 1080x1080 hero images from a background, an
//! optional logo and a title/description block, under fixed brand rules. It
//! provides:
//!
//! - **Layout**: deterministic logo geometry and text flow shared by preview and export
//! - **Compositing**: a live low-resolution preview and a full-resolution PNG export
//! - **Generation**: backgrounds, copy and WHY → HOW → WHAT storylines via AI providers
//! - **Server**: an HTTP API over all of the above
//!
//! ## Quick Start
//!
//! ```no_run
//! use hero_studio::{
//!     compose::export,
//!     layout::{CanvasSpec, LogoPosition, LogoSpec},
//!     typeface::BitmapFace,
//! };
//!
//! let logo = image::open("logo.png")?;
//! let logo_spec = LogoSpec::brand(LogoPosition::TopRight, 1.5, 52.0);
//!
//! let png = export::render(
//!     None,
//!     Some(&logo),
//!     &logo_spec,
//!     &CanvasSpec::export(),
//!     "Ship Faster",
//!     "Automate the boring parts.",
//!     &BitmapFace,
//! )?;
//! std::fs::write("hero-visual.png", png)?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`brand`] | Locked brand constants |
//! | [`layout`] | Logo geometry, word wrap, block flow |
//! | [`typeface`] | Text measuring and drawing |
//! | [`assets`] | Background/logo reference parsing and fetching |
//! | [`compose`] | Preview and export compositors |
//! | [`store`] | Editor state for hero and storyline tools |
//! | [`storyline`] | Scene records and storyline prompts |
//! | [`generate`] | Provider adapters and fallback chains |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod assets;
pub mod brand;
pub mod compose;
pub mod error;
pub mod generate;
pub mod layout;
pub mod server;
pub mod store;
pub mod storyline;
pub mod typeface;

// Re-exports for convenience
pub use error::HeroError;
pub use layout::{CanvasSpec, LogoPosition, LogoSpec};
