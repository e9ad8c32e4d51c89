//! Track storage on a FAT-formatted SD card over SPI.
//!
//! One [`SdMusic`] serves both the boot-time directory scan
//! ([`TrackSource`]) and the byte stream the decoder is fed from
//! ([`StreamSource`]). Handles are kept open between calls: the first
//! volume, the last directory visited and at most one file.

use crate::hw::vs1053::StreamSource;
use core::fmt::Write;
use defmt::{debug, warn, Debug2Format};
use embedded_sdmmc::{
    BlockDevice, Mode, RawDirectory, RawFile, RawVolume, TimeSource, Timestamp, VolumeIdx,
    VolumeManager,
};
use heapless::String;
use touchplayer::catalog::TrackSource;
use touchplayer::config::MAX_PATH_LEN;
use touchplayer::Error;

type SdResult<T, D> = Result<T, embedded_sdmmc::Error<<D as BlockDevice>::Error>>;

/// Read-only use, so file times never matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 56,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

pub struct SdMusic<D: BlockDevice> {
    volumes: VolumeManager<D, FixedTimeSource>,
    volume: Option<RawVolume>,
    dir: Option<(String<MAX_PATH_LEN>, RawDirectory)>,
    file: Option<RawFile>,
}

impl<D: BlockDevice> SdMusic<D> {
    /// Wrap a card. Nothing touches the card until the first call.
    pub fn new(card: D) -> Self {
        Self {
            volumes: VolumeManager::new(card, FixedTimeSource),
            volume: None,
            dir: None,
            file: None,
        }
    }

    fn volume(&mut self) -> SdResult<RawVolume, D> {
        if let Some(volume) = self.volume {
            return Ok(volume);
        }
        let volume = self.volumes.open_raw_volume(VolumeIdx(0))?;
        debug!("SD: volume 0 mounted");
        self.volume = Some(volume);
        Ok(volume)
    }

    /// Open `path` ("/music", "/" or "") walking down from the root.
    fn open_dir(&mut self, path: &str) -> SdResult<RawDirectory, D> {
        if let Some((open, dir)) = &self.dir {
            if open.as_str() == path {
                return Ok(*dir);
            }
        }
        if let Some((_, dir)) = self.dir.take() {
            let _ = self.volumes.close_dir(dir);
        }

        let volume = self.volume()?;
        let mut dir = self.volumes.open_root_dir(volume)?;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let child = self.volumes.open_dir(dir, part);
            let _ = self.volumes.close_dir(dir);
            dir = child?;
        }

        self.dir = Some((String::try_from(path).unwrap_or_default(), dir));
        Ok(dir)
    }

    fn open_file(&mut self, path: &str) -> SdResult<RawFile, D> {
        let (dir, name) = match path.rfind('/') {
            Some(pos) => (&path[..pos], &path[pos + 1..]),
            None => ("", path),
        };
        let dir = self.open_dir(dir)?;
        self.volumes.open_file_in_dir(dir, name, Mode::ReadOnly)
    }
}

impl<D: BlockDevice> TrackSource for SdMusic<D> {
    fn for_each_entry(
        &mut self,
        dir: &str,
        visit: &mut dyn FnMut(&str, bool),
    ) -> Result<(), Error> {
        let raw = self.open_dir(dir).map_err(|e| {
            warn!("SD: cannot open {}: {:?}", dir, Debug2Format(&e));
            Error::StorageUnavailable
        })?;

        self.volumes
            .iterate_dir(raw, |entry| {
                if entry.attributes.is_volume() {
                    return;
                }
                // 8.3 names always fit.
                let mut name: String<12> = String::new();
                if write!(name, "{}", entry.name).is_ok() {
                    visit(&name, entry.attributes.is_directory());
                }
            })
            .map_err(|e| {
                warn!("SD: listing {} failed: {:?}", dir, Debug2Format(&e));
                Error::StorageUnavailable
            })
    }
}

impl<D: BlockDevice> StreamSource for SdMusic<D> {
    fn open(&mut self, path: &str) -> bool {
        self.close();
        match self.open_file(path) {
            Ok(file) => {
                self.file = Some(file);
                true
            }
            Err(e) => {
                warn!("SD: cannot open {}: {:?}", path, Debug2Format(&e));
                false
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let Some(file) = self.file else {
            return 0;
        };
        match self.volumes.read(file, buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("SD: read failed: {:?}", Debug2Format(&e));
                0
            }
        }
    }

    fn close(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = self.volumes.close_file(file);
        }
    }
}
