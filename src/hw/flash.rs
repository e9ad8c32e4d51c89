//! Settings persisted in the nRF52840's internal flash.
//!
//! Uses a `sequential-storage` key-value map over the last
//! [`STORAGE_FLASH_PAGE_COUNT`] pages. Keys are [`SettingKey::id`];
//! values are 4-byte little-endian `i32`s.
//!
//! The map API is async; the NVMC itself is blocking, so calls are
//! driven to completion with `block_on`.

use core::ops::Range;
use defmt::{debug, error, warn};
use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};
use touchplayer::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use touchplayer::playback::{SettingKey, SettingsStore};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Scratch space for one map item (key + value + header).
const ITEM_BUF_SIZE: usize = 32;

pub struct FlashSettings<F> {
    flash: F,
}

impl<F: NorFlash> FlashSettings<F> {
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    fn range() -> Range<u32> {
        STORAGE_START..STORAGE_END
    }
}

impl<F: NorFlash> SettingsStore for FlashSettings<F> {
    fn get_int(&mut self, key: SettingKey, default: i32) -> i32 {
        let mut buf = [0u8; ITEM_BUF_SIZE];
        let fetched = block_on(fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            Self::range(),
            &mut NoCache::new(),
            &mut buf,
            &key.id(),
        ));

        match fetched {
            Ok(Some(data)) => match <[u8; 4]>::try_from(data) {
                Ok(bytes) => i32::from_le_bytes(bytes),
                Err(_) => {
                    warn!("Settings: '{}' has {} bytes, using default", key.name(), data.len());
                    default
                }
            },
            Ok(None) => {
                debug!("Settings: '{}' not stored, using {}", key.name(), default);
                default
            }
            Err(e) => {
                error!("Settings: read '{}' failed: {:?}", key.name(), defmt::Debug2Format(&e));
                default
            }
        }
    }

    fn put_int(&mut self, key: SettingKey, value: i32) {
        let mut buf = [0u8; ITEM_BUF_SIZE];
        let bytes = value.to_le_bytes();
        let item: &[u8] = &bytes;

        let stored = block_on(store_item::<u8, &[u8], _>(
            &mut self.flash,
            Self::range(),
            &mut NoCache::new(),
            &mut buf,
            &key.id(),
            &item,
        ));

        match stored {
            Ok(()) => debug!("Settings: '{}' = {}", key.name(), value),
            Err(e) => error!("Settings: write '{}' failed: {:?}", key.name(), defmt::Debug2Format(&e)),
        }
    }
}
