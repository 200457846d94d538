// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Navigation and classification state machine.
//!
//! This module owns the current photo index, the session phase, the
//! per-photo category cache, and the status line. It is free of any GUI
//! and HTTP types: input arrives as [`Intent`] values, work leaves as
//! [`Request`] values to be executed against a [`PhotoBackend`] on a
//! worker thread, and completions come back through [`Controller::apply`].
//!
//! Every request carries a generation number. Navigation bumps the
//! generation, so a completion that arrives after the user has already
//! moved on is recognized as stale and discarded instead of clobbering
//! the newer state.

use crate::api::{ApiError, PhotoBackend};
use crate::models::category::{Category, CategoryCounts, Memberships};
use std::time::{Duration, Instant};

/// How long the jump input stays flagged after rejecting bad input.
const JUMP_FLASH: Duration = Duration::from_millis(1200);

/// Decoded RGBA image ready for texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Session phase. `NoPhotos` and `AllDone` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the initial photo count.
    Starting,
    /// The collection was empty at startup.
    NoPhotos,
    /// Viewing the photo at the current index.
    Viewing,
    /// Every photo has been consumed.
    AllDone,
}

/// A user intention, produced by the input dispatch table in the UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    NextPhoto,
    PrevPhoto,
    SelectCurrent,
    UnselectCurrent,
    CopyToCategory(Category),
    RemoveFromCategory(Category),
    /// Raw text from the jump input, 1-based photo number expected.
    Jump(String),
}

/// One backend operation, executed off the UI thread by [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    FetchTotal,
    LoadPhoto { index: usize },
    Select { index: usize },
    Unselect { index: usize },
    CopyTo { category: Category, index: usize },
    RemoveFrom { category: Category, index: usize },
}

/// A work order handed to a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub generation: u64,
    pub op: Op,
}

/// What a completed operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TotalLoaded(usize),
    PhotoLoaded {
        selected: bool,
        selected_count: usize,
        memberships: Memberships,
        counts: CategoryCounts,
        /// Decoded image, or the URL of the resource that failed.
        image: Result<DecodedImage, String>,
    },
    Selected,
    Unselected,
    Copied {
        category: Category,
        counts: CategoryCounts,
    },
    Removed {
        category: Category,
        counts: CategoryCounts,
        memberships: Memberships,
    },
}

/// Completion of a [`Request`], delivered back to the controller.
#[derive(Debug)]
pub struct Response {
    pub generation: u64,
    pub outcome: Result<Outcome, ApiError>,
}

/// Run one operation against the backend.
///
/// Called on a worker thread; performs every HTTP round trip an outcome
/// needs, so the controller applies each response atomically. Image
/// fetch/decode failure is folded into the outcome rather than failing
/// the whole load.
pub fn execute(backend: &dyn PhotoBackend, op: &Op) -> Result<Outcome, ApiError> {
    match *op {
        Op::FetchTotal => Ok(Outcome::TotalLoaded(backend.total_photos()?)),
        Op::LoadPhoto { index } => {
            let selected = backend.is_selected(index)?;
            let selected_count = backend.selected_count()?;
            let memberships = fetch_memberships(backend, index)?;
            let counts = backend.category_counts()?;
            let image = match backend.fetch_image(index) {
                Ok(bytes) => decode_image(&bytes).map_err(|e| {
                    log::warn!("Failed to decode image {}: {}", index, e);
                    backend.image_url(index)
                }),
                Err(e) => {
                    log::warn!("Failed to fetch image {}: {}", index, e);
                    Err(backend.image_url(index))
                }
            };
            Ok(Outcome::PhotoLoaded {
                selected,
                selected_count,
                memberships,
                counts,
                image,
            })
        }
        Op::Select { index } => {
            backend.select(index)?;
            Ok(Outcome::Selected)
        }
        Op::Unselect { index } => {
            backend.unselect(index)?;
            Ok(Outcome::Unselected)
        }
        Op::CopyTo { category, index } => {
            backend.copy_to(category, index)?;
            Ok(Outcome::Copied {
                category,
                counts: backend.category_counts()?,
            })
        }
        Op::RemoveFrom { category, index } => {
            backend.remove_from(category, index)?;
            Ok(Outcome::Removed {
                category,
                counts: backend.category_counts()?,
                memberships: fetch_memberships(backend, index)?,
            })
        }
    }
}

/// One membership query per category; the set is small and fixed.
fn fetch_memberships(backend: &dyn PhotoBackend, index: usize) -> Result<Memberships, ApiError> {
    let mut memberships = Memberships::default();
    for category in Category::ALL {
        memberships.set(category, backend.is_in_category(category, index)?);
    }
    Ok(memberships)
}

fn decode_image(bytes: &[u8]) -> image::ImageResult<DecodedImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// The navigation/classification controller.
pub struct Controller {
    phase: Phase,
    index: usize,
    total: usize,
    /// 1-based deep-link photo number, consumed when the total arrives.
    seed: Option<usize>,

    /// Generation of the most recently issued request; responses with any
    /// other generation are stale.
    generation: u64,
    /// Generation of the request currently in flight, if any.
    pending: Option<u64>,

    status: String,
    delete_visible: bool,
    memberships: Memberships,
    counts: CategoryCounts,

    image: Option<DecodedImage>,
    image_alt: Option<String>,
    /// Bumped whenever `image` changes, so the shell knows to re-upload.
    image_revision: u64,
    /// When the current photo finished loading, for the fade-in.
    loaded_at: Option<Instant>,

    jump_flash_until: Option<Instant>,
}

impl Controller {
    /// Create a controller. `deep_link` is the 1-based photo number from
    /// the command line, applied once the total is known.
    pub fn new(deep_link: Option<usize>) -> Self {
        Self {
            phase: Phase::Starting,
            index: 0,
            total: 0,
            seed: deep_link,
            generation: 0,
            pending: None,
            status: "Loading photos...".to_string(),
            delete_visible: false,
            memberships: Memberships::default(),
            counts: CategoryCounts::default(),
            image: None,
            image_alt: None,
            image_revision: 0,
            loaded_at: None,
            jump_flash_until: None,
        }
    }

    /// First request of the session: fetch the photo count.
    pub fn start(&mut self) -> Request {
        self.request(Op::FetchTotal)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn delete_visible(&self) -> bool {
        self.delete_visible
    }

    pub fn memberships(&self) -> &Memberships {
        &self.memberships
    }

    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn image_alt(&self) -> Option<&str> {
        self.image_alt.as_deref()
    }

    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    /// When the current photo arrived, for the fade-in animation.
    pub fn loaded_at(&self) -> Option<Instant> {
        self.loaded_at
    }

    /// Whether the jump input should currently show its error flash.
    pub fn jump_flash_active(&self, now: Instant) -> bool {
        self.jump_flash_until.is_some_and(|until| now < until)
    }

    /// Translate a user intent into a backend request, if the current
    /// state admits it.
    ///
    /// Navigation intents preempt an in-flight request (the generation
    /// bump makes its completion stale). Mutating intents are rejected
    /// while any request is pending, so two classifications can never
    /// interleave their completions.
    pub fn dispatch(&mut self, intent: Intent, now: Instant) -> Option<Request> {
        if self.phase != Phase::Viewing {
            log::debug!("Ignoring {:?} outside viewing phase", intent);
            return None;
        }

        match intent {
            Intent::NextPhoto => {
                self.index = (self.index + 1).min(self.total - 1);
                Some(self.load_current())
            }
            Intent::PrevPhoto => {
                self.index = self.index.saturating_sub(1);
                Some(self.load_current())
            }
            Intent::Jump(raw) => match raw.trim().parse::<usize>() {
                Ok(number) if number >= 1 && number <= self.total => {
                    self.index = number - 1;
                    Some(self.load_current())
                }
                _ => {
                    log::debug!("Rejected jump input {:?}", raw);
                    self.jump_flash_until = Some(now + JUMP_FLASH);
                    None
                }
            },
            Intent::SelectCurrent => self.mutating(Op::Select { index: self.index }),
            Intent::UnselectCurrent => self.mutating(Op::Unselect { index: self.index }),
            Intent::CopyToCategory(category) => self.mutating(Op::CopyTo {
                category,
                index: self.index,
            }),
            Intent::RemoveFromCategory(category) => self.mutating(Op::RemoveFrom {
                category,
                index: self.index,
            }),
        }
    }

    /// Apply a completed request. Returns a follow-up request when the
    /// outcome requires another load (advance, correction reload, init).
    pub fn apply(&mut self, response: Response, now: Instant) -> Option<Request> {
        if response.generation != self.generation {
            log::debug!(
                "Discarding stale response (generation {} != {})",
                response.generation,
                self.generation
            );
            return None;
        }
        self.pending = None;

        let outcome = match response.outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Backend request failed: {}", e);
                self.status = format!("⚠️ {}", e);
                return None;
            }
        };

        match outcome {
            Outcome::TotalLoaded(total) => {
                self.total = total;
                if total == 0 {
                    self.enter_done(Phase::NoPhotos);
                    return None;
                }
                self.phase = Phase::Viewing;
                self.index = match self.seed.take() {
                    Some(number) if number >= 1 && number <= total => number - 1,
                    _ => 0,
                };
                Some(self.load_current())
            }
            Outcome::PhotoLoaded {
                selected,
                selected_count,
                memberships,
                counts,
                image,
            } => {
                self.status = format!(
                    "Photo {} of {} | Selected: {}",
                    self.index + 1,
                    self.total,
                    selected_count
                );
                self.delete_visible = selected;
                self.memberships = memberships;
                self.counts = counts;
                match image {
                    Ok(decoded) => {
                        self.image = Some(decoded);
                        self.image_alt = None;
                    }
                    Err(url) => {
                        self.image = None;
                        self.image_alt = Some(format!("Image failed to load: {}", url));
                        self.status = format!("Failed to load image: {}", url);
                    }
                }
                self.image_revision += 1;
                self.loaded_at = Some(now);
                None
            }
            Outcome::Selected => {
                self.status = format!("✅ Copied photo {}", self.index + 1);
                self.advance_after_action()
            }
            Outcome::Unselected => {
                self.status = format!("🗑️ Deleted photo {} from selected", self.index + 1);
                self.delete_visible = false;
                Some(self.load_current())
            }
            Outcome::Copied { category, counts } => {
                self.counts = counts;
                self.status = format!(
                    "✅ Copied photo {} to {}",
                    self.index + 1,
                    category.label()
                );
                self.advance_after_action()
            }
            Outcome::Removed {
                category,
                counts,
                memberships,
            } => {
                self.counts = counts;
                self.memberships = memberships;
                self.status = format!(
                    "🗑️ Removed photo {} from {}",
                    self.index + 1,
                    category.label()
                );
                None
            }
        }
    }

    /// Consume the current photo and move on: the shared transition
    /// behind select and every category copy.
    fn advance_after_action(&mut self) -> Option<Request> {
        self.index += 1;
        if self.index < self.total {
            Some(self.load_current())
        } else {
            // Keep the index in range should anything inspect it later.
            self.index = self.total - 1;
            self.enter_done(Phase::AllDone);
            None
        }
    }

    fn enter_done(&mut self, phase: Phase) {
        self.phase = phase;
        self.image = None;
        self.image_alt = None;
        self.image_revision += 1;
        self.status = "All photos done ✅".to_string();
        self.delete_visible = false;
    }

    fn load_current(&mut self) -> Request {
        debug_assert!(self.index < self.total);
        self.request(Op::LoadPhoto { index: self.index })
    }

    /// Mutating operations are serialized: at most one in flight.
    fn mutating(&mut self, op: Op) -> Option<Request> {
        if self.pending.is_some() {
            log::debug!("Ignoring {:?} while a request is in flight", op);
            return None;
        }
        Some(self.request(op))
    }

    fn request(&mut self, op: Op) -> Request {
        self.generation += 1;
        self.pending = Some(self.generation);
        Request {
            generation: self.generation,
            op,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory backend: a photo set with mutable selection and category
    /// membership, plus injectable failures.
    struct FakeBackend {
        total: usize,
        selected: Mutex<HashSet<usize>>,
        members: Mutex<HashMap<Category, HashSet<usize>>>,
        copy_failure: Option<String>,
        broken_images: bool,
    }

    impl FakeBackend {
        fn with_total(total: usize) -> Self {
            Self {
                total,
                selected: Mutex::new(HashSet::new()),
                members: Mutex::new(HashMap::new()),
                copy_failure: None,
                broken_images: false,
            }
        }

        fn add_member(&self, category: Category, index: usize) {
            self.members
                .lock()
                .unwrap()
                .entry(category)
                .or_default()
                .insert(index);
        }
    }

    impl PhotoBackend for FakeBackend {
        fn total_photos(&self) -> Result<usize, ApiError> {
            Ok(self.total)
        }

        fn selected_count(&self) -> Result<usize, ApiError> {
            Ok(self.selected.lock().unwrap().len())
        }

        fn is_selected(&self, index: usize) -> Result<bool, ApiError> {
            assert!(index < self.total, "out-of-range index {} requested", index);
            Ok(self.selected.lock().unwrap().contains(&index))
        }

        fn image_url(&self, index: usize) -> String {
            format!("fake:/api/image/{}", index)
        }

        fn fetch_image(&self, index: usize) -> Result<Vec<u8>, ApiError> {
            assert!(index < self.total, "out-of-range index {} requested", index);
            if self.broken_images {
                return Ok(vec![0u8; 4]);
            }
            Ok(tiny_png())
        }

        fn select(&self, index: usize) -> Result<(), ApiError> {
            self.selected.lock().unwrap().insert(index);
            Ok(())
        }

        fn unselect(&self, index: usize) -> Result<(), ApiError> {
            self.selected.lock().unwrap().remove(&index);
            Ok(())
        }

        fn copy_to(&self, category: Category, index: usize) -> Result<(), ApiError> {
            if let Some(message) = &self.copy_failure {
                return Err(ApiError::Backend {
                    status: 409,
                    message: message.clone(),
                });
            }
            self.add_member(category, index);
            Ok(())
        }

        fn remove_from(&self, category: Category, index: usize) -> Result<(), ApiError> {
            self.members
                .lock()
                .unwrap()
                .entry(category)
                .or_default()
                .remove(&index);
            Ok(())
        }

        fn category_counts(&self) -> Result<CategoryCounts, ApiError> {
            let members = self.members.lock().unwrap();
            let map: HashMap<Category, u32> = members
                .iter()
                .map(|(c, set)| (*c, set.len() as u32))
                .collect();
            Ok(CategoryCounts::from(map))
        }

        fn is_in_category(&self, category: Category, index: usize) -> Result<bool, ApiError> {
            Ok(self
                .members
                .lock()
                .unwrap()
                .get(&category)
                .is_some_and(|set| set.contains(&index)))
        }
    }

    fn now() -> Instant {
        Instant::now()
    }

    /// A valid 1x1 PNG, so loads succeed unless a test breaks them.
    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Execute a request chain to quiescence, like the worker loop does.
    fn settle(controller: &mut Controller, backend: &FakeBackend, first: Option<Request>) {
        let mut next = first;
        while let Some(request) = next {
            let outcome = execute(backend, &request.op);
            next = controller.apply(
                Response {
                    generation: request.generation,
                    outcome,
                },
                now(),
            );
        }
    }

    fn viewing_controller(backend: &FakeBackend, deep_link: Option<usize>) -> Controller {
        let mut controller = Controller::new(deep_link);
        let first = controller.start();
        settle(&mut controller, backend, Some(first));
        controller
    }

    #[test]
    fn test_init_starts_at_first_photo() {
        let backend = FakeBackend::with_total(3);
        let controller = viewing_controller(&backend, None);
        assert_eq!(controller.phase(), Phase::Viewing);
        assert_eq!(controller.index(), 0);
        assert_eq!(controller.total(), 3);
    }

    #[test]
    fn test_init_deep_link_seeds_index() {
        let backend = FakeBackend::with_total(5);
        let controller = viewing_controller(&backend, Some(4));
        assert_eq!(controller.index(), 3);
    }

    #[test]
    fn test_init_out_of_range_deep_link_falls_back_to_zero() {
        let backend = FakeBackend::with_total(5);
        let controller = viewing_controller(&backend, Some(9));
        assert_eq!(controller.index(), 0);
    }

    #[test]
    fn test_empty_collection_is_terminal() {
        let backend = FakeBackend::with_total(0);
        let controller = viewing_controller(&backend, None);
        assert_eq!(controller.phase(), Phase::NoPhotos);
        assert_eq!(controller.status(), "All photos done ✅");
        assert!(!controller.delete_visible());
        assert!(controller.image().is_none());
    }

    #[test]
    fn test_arrow_right_clamps_at_last_photo() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, Some(3));
        assert_eq!(controller.index(), 2);

        let request = controller.dispatch(Intent::NextPhoto, now()).unwrap();
        assert_eq!(request.op, Op::LoadPhoto { index: 2 });
        assert_eq!(controller.index(), 2);
    }

    #[test]
    fn test_arrow_left_clamps_at_first_photo() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        let request = controller.dispatch(Intent::PrevPhoto, now()).unwrap();
        assert_eq!(request.op, Op::LoadPhoto { index: 0 });
        assert_eq!(controller.index(), 0);
    }

    #[test]
    fn test_arrows_move_between_photos() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        let request = controller.dispatch(Intent::NextPhoto, now()).unwrap();
        settle(&mut controller, &backend, Some(request));
        assert_eq!(controller.index(), 1);
        assert!(controller.status().starts_with("Photo 2 of 3"));

        let request = controller.dispatch(Intent::PrevPhoto, now()).unwrap();
        settle(&mut controller, &backend, Some(request));
        assert_eq!(controller.index(), 0);
    }

    #[test]
    fn test_jump_accepts_in_range_number() {
        let backend = FakeBackend::with_total(4);
        let mut controller = viewing_controller(&backend, None);

        let request = controller
            .dispatch(Intent::Jump("3".to_string()), now())
            .unwrap();
        assert_eq!(request.op, Op::LoadPhoto { index: 2 });
        assert!(!controller.jump_flash_active(now()));
    }

    #[test]
    fn test_jump_rejects_invalid_input() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);
        let t = now();

        for raw in ["0", "4", "abc", "-1", ""] {
            assert!(
                controller.dispatch(Intent::Jump(raw.to_string()), t).is_none(),
                "jump {:?} should be rejected",
                raw
            );
            assert_eq!(controller.index(), 0);
            assert!(controller.jump_flash_active(t));
        }
    }

    #[test]
    fn test_jump_flash_expires() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);
        let t = now();

        controller.dispatch(Intent::Jump("no".to_string()), t);
        assert!(controller.jump_flash_active(t + Duration::from_millis(1100)));
        assert!(!controller.jump_flash_active(t + Duration::from_millis(1300)));
    }

    #[test]
    fn test_select_advances_to_next_photo() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        let request = controller.dispatch(Intent::SelectCurrent, now()).unwrap();
        let outcome = execute(&backend, &request.op);
        let follow_up = controller.apply(
            Response {
                generation: request.generation,
                outcome,
            },
            now(),
        );

        // Status reports the consumed photo before the reload overwrites it.
        assert_eq!(controller.status(), "✅ Copied photo 1");
        assert_eq!(controller.index(), 1);

        settle(&mut controller, &backend, follow_up);
        assert!(controller.status().starts_with("Photo 2 of 3"));
        assert!(backend.selected.lock().unwrap().contains(&0));
    }

    #[test]
    fn test_select_last_photo_finishes_session() {
        let backend = FakeBackend::with_total(1);
        let mut controller = viewing_controller(&backend, None);

        let request = controller.dispatch(Intent::SelectCurrent, now()).unwrap();
        settle(&mut controller, &backend, Some(request));

        assert_eq!(controller.phase(), Phase::AllDone);
        assert_eq!(controller.status(), "All photos done ✅");
        assert!(controller.image().is_none());
        assert!(!controller.delete_visible());

        // Terminal: further intents are ignored.
        assert!(controller.dispatch(Intent::NextPhoto, now()).is_none());
        assert!(controller.dispatch(Intent::SelectCurrent, now()).is_none());
    }

    #[test]
    fn test_unselect_reloads_same_photo() {
        let backend = FakeBackend::with_total(3);
        backend.select(1).unwrap();
        let mut controller = viewing_controller(&backend, Some(2));
        assert!(controller.delete_visible());

        let request = controller.dispatch(Intent::UnselectCurrent, now()).unwrap();
        let outcome = execute(&backend, &request.op);
        let follow_up = controller.apply(
            Response {
                generation: request.generation,
                outcome,
            },
            now(),
        );
        assert_eq!(controller.status(), "🗑️ Deleted photo 2 from selected");
        assert_eq!(controller.index(), 1);
        assert_eq!(
            follow_up.as_ref().map(|r| &r.op),
            Some(&Op::LoadPhoto { index: 1 })
        );

        settle(&mut controller, &backend, follow_up);
        assert!(!controller.delete_visible());
        assert!(!backend.selected.lock().unwrap().contains(&1));
    }

    #[test]
    fn test_copy_to_category_advances_and_updates_counts() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        let request = controller
            .dispatch(Intent::CopyToCategory(Category::Haldi), now())
            .unwrap();
        settle(&mut controller, &backend, Some(request));

        assert_eq!(controller.index(), 1);
        assert_eq!(controller.counts().get(Category::Haldi), 1);
    }

    #[test]
    fn test_copy_failure_reports_error_and_stays_put() {
        let mut backend = FakeBackend::with_total(3);
        backend.copy_failure = Some("quota exceeded".to_string());
        let mut controller = viewing_controller(&backend, None);

        let request = controller
            .dispatch(Intent::CopyToCategory(Category::Haldi), now())
            .unwrap();
        settle(&mut controller, &backend, Some(request));

        assert_eq!(controller.index(), 0);
        assert!(controller.status().starts_with("⚠️"));
        assert!(controller.status().contains("quota exceeded"));

        // The action can be retried once the failure has been applied.
        assert!(controller
            .dispatch(Intent::CopyToCategory(Category::Haldi), now())
            .is_some());
    }

    #[test]
    fn test_remove_from_category_flips_membership() {
        let backend = FakeBackend::with_total(3);
        backend.add_member(Category::Tilak, 0);
        backend.add_member(Category::Tilak, 2);
        let mut controller = viewing_controller(&backend, None);
        assert!(controller.memberships().contains(Category::Tilak));
        assert_eq!(controller.counts().get(Category::Tilak), 2);

        let request = controller
            .dispatch(Intent::RemoveFromCategory(Category::Tilak), now())
            .unwrap();
        settle(&mut controller, &backend, Some(request));

        // Correction, not completion: same photo, refreshed cache.
        assert_eq!(controller.index(), 0);
        assert!(!controller.memberships().contains(Category::Tilak));
        assert_eq!(controller.counts().get(Category::Tilak), 1);
        assert_eq!(controller.status(), "🗑️ Removed photo 1 from Tilak");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        // First load is still in flight when the user navigates again.
        let old = controller.dispatch(Intent::NextPhoto, now()).unwrap();
        let new = controller.dispatch(Intent::NextPhoto, now()).unwrap();
        assert_eq!(controller.index(), 2);

        let stale_outcome = execute(&backend, &old.op);
        assert!(controller
            .apply(
                Response {
                    generation: old.generation,
                    outcome: stale_outcome,
                },
                now(),
            )
            .is_none());
        // The stale completion must not touch the newer state.
        assert_eq!(controller.index(), 2);

        settle(&mut controller, &backend, Some(new));
        assert!(controller.status().starts_with("Photo 3 of 3"));
    }

    #[test]
    fn test_mutating_intent_rejected_while_request_pending() {
        let backend = FakeBackend::with_total(3);
        let mut controller = viewing_controller(&backend, None);

        let request = controller.dispatch(Intent::SelectCurrent, now()).unwrap();
        assert!(controller.dispatch(Intent::SelectCurrent, now()).is_none());
        assert!(controller
            .dispatch(Intent::CopyToCategory(Category::Barat), now())
            .is_none());

        settle(&mut controller, &backend, Some(request));
        assert_eq!(controller.index(), 1);
    }

    #[test]
    fn test_loaded_image_clears_alt_text() {
        let backend = FakeBackend::with_total(2);
        let controller = viewing_controller(&backend, None);
        assert!(controller.image().is_some());
        assert!(controller.image_alt().is_none());
        assert!(controller.loaded_at().is_some());
    }

    #[test]
    fn test_failed_image_sets_alt_text() {
        let mut backend = FakeBackend::with_total(2);
        backend.broken_images = true;
        let controller = viewing_controller(&backend, None);

        assert!(controller.image().is_none());
        assert_eq!(
            controller.image_alt(),
            Some("Image failed to load: fake:/api/image/0")
        );
        assert_eq!(controller.status(), "Failed to load image: fake:/api/image/0");
    }
}
