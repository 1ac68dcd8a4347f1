// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat};

use super::{Metadata, ResourceBackend, ResourceError, ResourceHandle};

pub const DEFAULT_THUMBNAIL_EDGE: u32 = 256;

#[derive(Debug)]
struct LoadedImage {
    path: PathBuf,
    format: Option<ImageFormat>,
    byte_len: usize,
    image: DynamicImage,
}

/// Backend that decodes files from disk with the `image` crate.
///
/// Handles come from a counter starting at 1 and are never reissued within one backend.
#[derive(Debug)]
pub struct FileBackend {
    next_handle: u64,
    loaded: HashMap<ResourceHandle, LoadedImage>,
    thumbnail_edge: u32,
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FileBackend {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            loaded: HashMap::new(),
            thumbnail_edge: DEFAULT_THUMBNAIL_EDGE,
        }
    }

    /// Thumbnails are scaled (preserving aspect ratio) to fit in an `edge`×`edge` box.
    pub fn with_thumbnail_edge(mut self, edge: u32) -> Self {
        self.thumbnail_edge = edge.max(1);
        self
    }

    pub fn live_handles(&self) -> usize {
        self.loaded.len()
    }

    fn get(&self, handle: ResourceHandle) -> Result<&LoadedImage, ResourceError> {
        self.loaded
            .get(&handle)
            .ok_or(ResourceError::UnknownHandle { handle })
    }
}

impl ResourceBackend for FileBackend {
    fn load(&mut self, path: &Path) -> Result<ResourceHandle, ResourceError> {
        let bytes = fs::read(path).map_err(|err| ResourceError::load(path, err))?;
        let format = image::guess_format(&bytes).ok();
        let image = image::load_from_memory(&bytes).map_err(|err| ResourceError::load(path, err))?;

        let handle = ResourceHandle::new(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.loaded.insert(
            handle,
            LoadedImage {
                path: path.to_path_buf(),
                format,
                byte_len: bytes.len(),
                image,
            },
        );
        log::debug!("loaded {path:?} as {handle}");
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        match self.loaded.remove(&handle) {
            Some(loaded) => log::debug!("released {handle} ({:?})", loaded.path),
            None => log::warn!("release of unknown resource handle {handle} ignored"),
        }
    }

    fn thumbnail(&self, handle: ResourceHandle) -> Result<Vec<u8>, ResourceError> {
        let loaded = self.get(handle)?;
        let thumb = loaded
            .image
            .thumbnail(self.thumbnail_edge, self.thumbnail_edge);
        let mut out = Cursor::new(Vec::new());
        thumb
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|err| ResourceError::decode(handle, err))?;
        Ok(out.into_inner())
    }

    fn metadata(&self, handle: ResourceHandle) -> Result<Metadata, ResourceError> {
        let loaded = self.get(handle)?;
        let (width, height) = GenericImageView::dimensions(&loaded.image);

        let mut meta = Metadata::new();
        if let Some(name) = loaded.path.file_name() {
            meta.insert("file_name".to_owned(), name.to_string_lossy().into_owned());
        }
        let format = loaded
            .format
            .map_or_else(|| "unknown".to_owned(), |format| format!("{format:?}"));
        meta.insert("format".to_owned(), format);
        meta.insert("width".to_owned(), width.to_string());
        meta.insert("height".to_owned(), height.to_string());
        meta.insert("color_type".to_owned(), format!("{:?}", loaded.image.color()));
        meta.insert("byte_len".to_owned(), loaded.byte_len.to_string());
        Ok(meta)
    }
}
