//! Live preview surface.
//!
//! The compositor owns the decoded background and logo and a cached surface.
//! Decodes are tracked per slot with a generation counter: each
//! [`PreviewCompositor::begin_decode`] hands out a [`DecodeTicket`], and only
//! the ticket of the latest decode for that slot may install its image. A slow
//! decode that finishes after a newer one started is dropped.
//!
//! Syncs are also ordered by [`HeroState::revision`]: once a snapshot has been
//! seen, an older snapshot can no longer start decodes.

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Layers, paint};
use crate::assets::{AssetRef, AssetSlot, ImageAcquirer, non_empty};
use crate::error::HeroError;
use crate::layout::{self, CanvasSpec, LayoutDescriptor};
use crate::store::{HeroState, RenderFields};
use crate::typeface::Typeface;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    reference: Option<String>,
    image: Option<Arc<DynamicImage>>,
}

/// Proof that a decode was started; redeemed by [`PreviewCompositor::complete_decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTicket {
    pub slot: AssetSlot,
    pub reference: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderKey {
    fields: RenderFields,
    images_revision: u64,
}

pub struct PreviewCompositor {
    canvas: CanvasSpec,
    face: Arc<dyn Typeface>,
    background: Slot,
    logo: Slot,
    /// Bumped whenever a decoded image is installed or dropped.
    images_revision: u64,
    /// Newest state revision a sync has been started for.
    state_revision: u64,
    rendered_key: Option<RenderKey>,
    surface: RgbaImage,
    renders: u64,
}

impl PreviewCompositor {
    pub fn new(preview_px: u32, face: Arc<dyn Typeface>) -> Self {
        let canvas = CanvasSpec::preview(preview_px.max(1));
        let surface = RgbaImage::from_pixel(canvas.size_px, canvas.size_px, canvas.fallback_color);
        Self {
            canvas,
            face,
            background: Slot::default(),
            logo: Slot::default(),
            images_revision: 0,
            state_revision: 0,
            rendered_key: None,
            surface,
            renders: 0,
        }
    }

    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }

    pub fn scale(&self) -> f32 {
        self.canvas.scale()
    }

    /// Number of times the surface has actually been repainted.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    fn slot(&self, slot: AssetSlot) -> &Slot {
        match slot {
            AssetSlot::Background => &self.background,
            AssetSlot::Logo => &self.logo,
        }
    }

    fn slot_mut(&mut self, slot: AssetSlot) -> &mut Slot {
        match slot {
            AssetSlot::Background => &mut self.background,
            AssetSlot::Logo => &mut self.logo,
        }
    }

    pub fn has_image(&self, slot: AssetSlot) -> bool {
        self.slot(slot).image.is_some()
    }

    /// Record a state revision; false when a newer one has already been seen.
    pub fn observe_revision(&mut self, revision: u64) -> bool {
        if revision < self.state_revision {
            return false;
        }
        self.state_revision = revision;
        true
    }

    /// Whether `reference` differs from what the slot last started decoding.
    pub fn needs_decode(&self, slot: AssetSlot, reference: Option<&str>) -> bool {
        self.slot(slot).reference.as_deref() != reference
    }

    /// Start decoding `reference` into `slot`, superseding any pending decode.
    pub fn begin_decode(&mut self, slot: AssetSlot, reference: impl Into<String>) -> DecodeTicket {
        let reference = reference.into();
        let entry = self.slot_mut(slot);
        entry.generation += 1;
        entry.reference = Some(reference.clone());
        let generation = entry.generation;
        if entry.image.take().is_some() {
            self.images_revision += 1;
        }
        DecodeTicket {
            slot,
            reference,
            generation,
        }
    }

    /// Install the outcome of a decode.
    ///
    /// Returns false when the ticket was superseded; its result is discarded.
    /// A failed decode leaves the slot empty.
    pub fn complete_decode(&mut self, ticket: DecodeTicket, result: Result<DynamicImage, HeroError>) -> bool {
        let entry = self.slot_mut(ticket.slot);
        if entry.generation != ticket.generation {
            tracing::debug!(
                slot = %ticket.slot,
                ticket = ticket.generation,
                current = entry.generation,
                "discarding superseded decode"
            );
            return false;
        }

        match result {
            Ok(image) => entry.image = Some(Arc::new(image)),
            Err(e) => {
                tracing::debug!(slot = %ticket.slot, error = %e, "preview decode failed");
                entry.image = None;
            }
        }
        self.images_revision += 1;
        true
    }

    /// Drop the slot's image and invalidate outstanding tickets.
    pub fn clear(&mut self, slot: AssetSlot) {
        let entry = self.slot_mut(slot);
        entry.generation += 1;
        entry.reference = None;
        if entry.image.take().is_some() {
            self.images_revision += 1;
        }
    }

    /// Geometry for the current state at preview scale.
    pub fn layout(&self, state: &HeroState) -> LayoutDescriptor {
        let logo_natural = self.logo.image.as_ref().map(|l| (l.width(), l.height()));
        layout::plan(
            &self.canvas,
            logo_natural,
            &state.logo_spec(),
            &state.title,
            &state.description,
            self.face.as_ref(),
        )
    }

    /// The preview surface for `state`, repainted only when something visible changed.
    pub fn render(&mut self, state: &HeroState) -> &RgbaImage {
        let key = RenderKey {
            fields: state.render_fields(),
            images_revision: self.images_revision,
        };
        if self.rendered_key.as_ref() != Some(&key) {
            let plan = self.layout(state);
            let layers = Layers {
                background: self.background.image.as_deref(),
                logo: self.logo.image.as_deref(),
            };
            self.surface = paint(&self.canvas, layers, &plan, self.face.as_ref(), FilterType::Triangle);
            self.rendered_key = Some(key);
            self.renders += 1;
        }
        &self.surface
    }
}

/// Bring the compositor's images in line with `state`.
///
/// Changed references are decoded concurrently; the lock is released while
/// fetching so a newer sync can supersede this one.
pub async fn sync(compositor: &Mutex<PreviewCompositor>, state: &HeroState, acquirer: &ImageAcquirer) {
    let revision = state.revision;
    tokio::join!(
        sync_slot(compositor, AssetSlot::Background, state.selected_background_url.as_deref(), revision, acquirer),
        sync_slot(compositor, AssetSlot::Logo, state.logo_url.as_deref(), revision, acquirer),
    );
}

async fn sync_slot(
    compositor: &Mutex<PreviewCompositor>,
    slot: AssetSlot,
    reference: Option<&str>,
    revision: u64,
    acquirer: &ImageAcquirer,
) {
    let reference = non_empty(reference);
    let ticket = {
        let mut guard = compositor.lock().await;
        if !guard.observe_revision(revision) {
            tracing::debug!(%slot, revision, "skipping sync for outdated state");
            return;
        }
        if !guard.needs_decode(slot, reference) {
            return;
        }
        match reference {
            Some(reference) => guard.begin_decode(slot, reference),
            None => {
                guard.clear(slot);
                return;
            }
        }
    };

    let result = match AssetRef::parse(slot, &ticket.reference) {
        Ok(parsed) => acquirer.load(slot, &parsed).await,
        Err(e) => Err(e),
    };
    compositor.lock().await.complete_decode(ticket, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::to_data_uri;
    use crate::brand;
    use crate::layout::LogoPosition;
    use crate::typeface::BitmapFace;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;
    use std::time::Duration;

    fn compositor() -> PreviewCompositor {
        PreviewCompositor::new(100, Arc::new(BitmapFace))
    }

    fn solid(w: u32, h: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(color)))
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut preview = compositor();
        let first = preview.begin_decode(AssetSlot::Background, "https://x.test/a.png");
        let second = preview.begin_decode(AssetSlot::Background, "https://x.test/b.png");

        assert!(preview.complete_decode(second, Ok(solid(10, 10, [0, 0, 255, 255]))));
        assert!(!preview.complete_decode(first, Ok(solid(10, 10, [255, 0, 0, 255]))));

        let state = HeroState::default();
        let surface = preview.render(&state);
        assert_eq!(surface.get_pixel(50, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_clear_invalidates_pending_ticket() {
        let mut preview = compositor();
        let ticket = preview.begin_decode(AssetSlot::Logo, "/logo/a.png");
        preview.clear(AssetSlot::Logo);
        assert!(!preview.complete_decode(ticket, Ok(solid(4, 4, [0, 0, 0, 255]))));
        assert!(!preview.has_image(AssetSlot::Logo));
    }

    #[test]
    fn test_failed_decode_leaves_slot_empty() {
        let mut preview = compositor();
        let ticket = preview.begin_decode(AssetSlot::Background, "https://x.test/a.png");
        let failure = HeroError::asset_unreadable(AssetSlot::Background, "HTTP 404");
        assert!(preview.complete_decode(ticket, Err(failure)));
        assert!(!preview.has_image(AssetSlot::Background));
        let surface = preview.render(&HeroState::default());
        assert!(surface.pixels().all(|p| *p == brand::FALLBACK_COLOR));
    }

    #[test]
    fn test_render_is_cached_until_visible_change() {
        let mut preview = compositor();
        let mut state = HeroState::default();
        preview.render(&state);
        preview.render(&state);
        assert_eq!(preview.render_count(), 1);

        state.set_prompt("not visible");
        preview.render(&state);
        assert_eq!(preview.render_count(), 1);

        state.set_title("Visible");
        preview.render(&state);
        assert_eq!(preview.render_count(), 2);

        let ticket = preview.begin_decode(AssetSlot::Logo, "/logo/a.png");
        preview.complete_decode(ticket, Ok(solid(40, 10, [0, 255, 0, 255])));
        preview.render(&state);
        assert_eq!(preview.render_count(), 3);
    }

    #[test]
    fn test_layout_uses_preview_scale() {
        let mut preview = PreviewCompositor::new(540, Arc::new(BitmapFace));
        let ticket = preview.begin_decode(AssetSlot::Logo, "/logo/a.png");
        preview.complete_decode(ticket, Ok(solid(400, 100, [0, 0, 0, 255])));

        let mut state = HeroState::default();
        state.set_logo_position(LogoPosition::TopLeft);
        state.set_logo_padding(52.0);
        let plan = preview.layout(&state);
        let logo = plan.logo.unwrap();
        assert!((logo.x - 26.0).abs() < 1e-4);
        assert!((logo.w - 100.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_sync_decodes_and_clears() {
        let mut png = Vec::new();
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let acquirer = ImageAcquirer::new(Duration::from_secs(1), None).unwrap();
        let preview = Mutex::new(compositor());

        let mut state = HeroState::default();
        state.set_selected_background(Some(to_data_uri("image/png", &png)));
        sync(&preview, &state, &acquirer).await;
        assert!(preview.lock().await.has_image(AssetSlot::Background));

        state.set_selected_background(None);
        sync(&preview, &state, &acquirer).await;
        assert!(!preview.lock().await.has_image(AssetSlot::Background));
    }

    #[tokio::test]
    async fn test_outdated_snapshot_cannot_replace_newer_image() {
        let encode = |color: [u8; 4]| {
            let mut png = Vec::new();
            RgbaImage::from_pixel(8, 8, Rgba(color))
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .unwrap();
            to_data_uri("image/png", &png)
        };
        let acquirer = ImageAcquirer::new(Duration::from_secs(1), None).unwrap();
        let preview = Mutex::new(compositor());

        let mut outdated = HeroState::default();
        outdated.set_selected_background(Some(encode([255, 0, 0, 255])));
        let mut current = outdated.clone();
        current.set_selected_background(Some(encode([0, 0, 255, 255])));

        sync(&preview, &current, &acquirer).await;
        sync(&preview, &outdated, &acquirer).await;

        let mut guard = preview.lock().await;
        assert!(guard.has_image(AssetSlot::Background));
        assert_eq!(guard.render(&current).get_pixel(50, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_observe_revision_is_monotonic() {
        let mut preview = compositor();
        assert!(preview.observe_revision(3));
        assert!(preview.observe_revision(3));
        assert!(!preview.observe_revision(2));
        assert!(preview.observe_revision(7));
    }

    #[tokio::test]
    async fn test_sync_swallows_ephemeral_reference() {
        let acquirer = ImageAcquirer::new(Duration::from_secs(1), None).unwrap();
        let preview = Mutex::new(compositor());
        let mut state = HeroState::default();
        state.set_logo(Some("blob:http://localhost/abc".into()));
        sync(&preview, &state, &acquirer).await;
        let mut guard = preview.lock().await;
        assert!(!guard.has_image(AssetSlot::Logo));
        assert_eq!(guard.render(&state).dimensions(), (100, 100));
    }
}
