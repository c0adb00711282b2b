use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{GalleryImage, ImageBlock};

use super::gallery::viewable;
use super::inline::is_safe_url;

pub const AUTO_ADVANCE: Duration = Duration::from_secs(5);
pub const TRANSITION: Duration = Duration::from_millis(500);

// Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock(Arc<AtomicBool>);

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn unlock(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightboxImage {
    pub url: String,
    pub caption: Option<String>,
    pub alt: Option<String>,
}

impl From<&ImageBlock> for LightboxImage {
    fn from(image: &ImageBlock) -> Self {
        Self {
            url: image.url.clone(),
            caption: image.caption.clone(),
            alt: image.alt.clone(),
        }
    }
}

impl From<&GalleryImage> for LightboxImage {
    fn from(image: &GalleryImage) -> Self {
        Self {
            url: image.url.clone(),
            caption: image.caption.clone(),
            alt: image.alt.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lightbox {
    #[default]
    Closed,
    Single(LightboxImage),
    Gallery {
        block_id: String,
        images: Vec<LightboxImage>,
        index: usize,
    },
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        !matches!(self, Lightbox::Closed)
    }

    pub fn current(&self) -> Option<&LightboxImage> {
        match self {
            Lightbox::Closed => None,
            Lightbox::Single(image) => Some(image),
            Lightbox::Gallery { images, index, .. } => images.get(*index),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

impl Key {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

// Moves are refused while a transition is still running.
#[derive(Clone, Debug)]
pub struct Carousel {
    index: usize,
    len: usize,
    last_move: Instant,
    animating_until: Option<Instant>,
}

impl Carousel {
    pub fn new(len: usize, now: Instant) -> Self {
        Self {
            index: 0,
            len,
            last_move: now,
            animating_until: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.animating_until.is_some_and(|until| now < until)
    }

    pub fn next(&mut self, now: Instant) -> bool {
        if self.len == 0 {
            return false;
        }
        self.go_to((self.index + 1) % self.len, now)
    }

    pub fn prev(&mut self, now: Instant) -> bool {
        if self.len == 0 {
            return false;
        }
        self.go_to((self.index + self.len - 1) % self.len, now)
    }

    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.len || self.is_animating(now) {
            return false;
        }
        self.index = index;
        self.last_move = now;
        self.animating_until = Some(now + TRANSITION);
        true
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if self.len < 2 || now.saturating_duration_since(self.last_move) < AUTO_ADVANCE {
            return false;
        }
        self.next(now)
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    open_item: Option<(String, usize)>,
    lightbox: Lightbox,
    carousels: HashMap<String, Carousel>,
    scroll_lock: ScrollLock,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_lock(scroll_lock: ScrollLock) -> Self {
        Self {
            scroll_lock,
            ..Self::default()
        }
    }

    // Opening an item closes whatever was open anywhere else.
    pub fn toggle_accordion(&mut self, block_id: &str, index: usize) {
        let same = self
            .open_item
            .as_ref()
            .is_some_and(|(id, idx)| id == block_id && *idx == index);
        self.open_item = if same {
            None
        } else {
            Some((block_id.to_string(), index))
        };
    }

    pub fn is_accordion_open(&self, block_id: &str, index: usize) -> bool {
        self.open_item
            .as_ref()
            .is_some_and(|(id, idx)| id == block_id && *idx == index)
    }

    pub fn open_image(&mut self, image: &ImageBlock) {
        if !is_safe_url(&image.url) {
            tracing::debug!("image with unsafe url not opened");
            return;
        }
        self.lightbox = Lightbox::Single(image.into());
        self.scroll_lock.lock();
    }

    // `index` counts the images the gallery renders, which skips unsafe urls.
    pub fn open_gallery(&mut self, block_id: &str, images: &[GalleryImage], index: usize) {
        let images: Vec<LightboxImage> = viewable(images)
            .into_iter()
            .map(LightboxImage::from)
            .collect();
        if images.is_empty() {
            return;
        }
        let index = index.min(images.len() - 1);
        self.lightbox = Lightbox::Gallery {
            block_id: block_id.to_string(),
            images,
            index,
        };
        self.scroll_lock.lock();
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = Lightbox::Closed;
        self.scroll_lock.unlock();
    }

    pub fn click_backdrop(&mut self) {
        if self.lightbox.is_open() {
            self.close_lightbox();
        }
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        if key == Key::Escape {
            if !self.lightbox.is_open() {
                return false;
            }
            self.close_lightbox();
            return true;
        }
        let Lightbox::Gallery { images, index, .. } = &mut self.lightbox else {
            return false;
        };
        let len = images.len();
        if len < 2 {
            return false;
        }
        *index = match key {
            Key::ArrowRight => (*index + 1) % len,
            Key::ArrowLeft => (*index + len - 1) % len,
            Key::Escape => *index,
        };
        true
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    pub fn carousel(&self, block_id: &str) -> Option<&Carousel> {
        self.carousels.get(block_id)
    }

    // A gallery whose image count changed starts over.
    pub fn carousel_mut(&mut self, block_id: &str, len: usize, now: Instant) -> &mut Carousel {
        let carousel = self
            .carousels
            .entry(block_id.to_string())
            .or_insert_with(|| Carousel::new(len, now));
        if carousel.len != len {
            *carousel = Carousel::new(len, now);
        }
        carousel
    }

    pub fn tick(&mut self, now: Instant) -> usize {
        self.carousels
            .values_mut()
            .map(|carousel| carousel.tick(now))
            .filter(|moved| *moved)
            .count()
    }
}
