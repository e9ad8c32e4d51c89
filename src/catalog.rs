//! Track catalog - the ordered list of playable files built at boot.
//!
//! The storage collaborator only enumerates directory entries. Filtering
//! (`.mp3`, case-insensitive), path prefixing and the 30-entry bound are
//! applied here so they can be tested on the host. Order is whatever the
//! filesystem yields; nothing is sorted.

use crate::config::{MAX_PATH_LEN, MAX_TRACKS, MUSIC_DIR, TRACK_EXTENSION};
use crate::error::Error;
use core::fmt::Write;
use heapless::{String, Vec};

/// Full path of a track, e.g. `/music/SONG.MP3`.
pub type TrackPath = String<MAX_PATH_LEN>;

/// Directory enumeration provided by the storage layer.
pub trait TrackSource {
    /// Call `visit(name, is_dir)` for every entry of `dir`, in the order
    /// the filesystem yields them.
    ///
    /// Fails with [`Error::StorageUnavailable`] when the medium or the
    /// directory cannot be opened.
    fn for_each_entry(
        &mut self,
        dir: &str,
        visit: &mut dyn FnMut(&str, bool),
    ) -> Result<(), Error>;
}

/// True if `name` ends in `.mp3`, ignoring ASCII case.
pub fn is_track_file(name: &str) -> bool {
    let ext = TRACK_EXTENSION.as_bytes();
    let bytes = name.as_bytes();
    bytes.len() > ext.len() && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

/// Name shown on screen: everything after the last `/`.
pub fn display_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Immutable, non-empty list of track paths.
#[derive(Clone, Debug)]
pub struct Catalog {
    tracks: Vec<TrackPath, MAX_TRACKS>,
}

impl Catalog {
    /// Enumerate [`MUSIC_DIR`] and keep up to [`MAX_TRACKS`] `.mp3` files.
    ///
    /// Fails with [`Error::NoTracks`] if nothing playable was found.
    pub fn scan<S: TrackSource>(source: &mut S) -> Result<Self, Error> {
        let mut tracks: Vec<TrackPath, MAX_TRACKS> = Vec::new();
        let mut dropped = 0usize;

        source.for_each_entry(MUSIC_DIR, &mut |name, is_dir| {
            if is_dir || !is_track_file(name) {
                return;
            }
            let mut path = TrackPath::new();
            if write!(path, "{}/{}", MUSIC_DIR, name).is_err() || tracks.push(path).is_err() {
                dropped += 1;
            }
        })?;

        if dropped > 0 {
            warn!("Catalog: skipped {} tracks (full or path too long)", dropped);
        }

        Self::from_tracks(tracks)
    }

    /// Build a catalog from already-qualified paths (kept in order).
    ///
    /// Entries beyond capacity or longer than [`MAX_PATH_LEN`] are skipped.
    pub fn from_paths<'a, I>(paths: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tracks: Vec<TrackPath, MAX_TRACKS> = Vec::new();
        for p in paths {
            if let Ok(path) = TrackPath::try_from(p) {
                if tracks.push(path).is_err() {
                    break;
                }
            }
        }
        Self::from_tracks(tracks)
    }

    fn from_tracks(tracks: Vec<TrackPath, MAX_TRACKS>) -> Result<Self, Error> {
        if tracks.is_empty() {
            error!("Catalog: no playable tracks in {}", MUSIC_DIR);
            return Err(Error::NoTracks);
        }
        info!("Catalog: {} tracks", tracks.len());
        Ok(Self { tracks })
    }

    /// Number of tracks (always at least one).
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// A catalog is never empty once built; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Full path of the track at `index`.
    pub fn path(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(|p| p.as_str())
    }

    /// Index after `index`, wrapping to the first track.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Index before `index`, wrapping to the last track.
    pub fn prev_index(&self, index: usize) -> usize {
        if index == 0 || index >= self.len() {
            self.len() - 1
        } else {
            index - 1
        }
    }

    /// `index` if it addresses a track, otherwise the first track.
    pub fn clamp_index(&self, index: i32) -> usize {
        match usize::try_from(index) {
            Ok(i) if i < self.len() => i,
            _ => 0,
        }
    }
}
