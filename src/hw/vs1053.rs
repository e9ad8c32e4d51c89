//! VS1053 hardware MP3 decoder.
//!
//! The chip decodes on its own; the MCU only keeps its 2 KB input FIFO
//! topped up. Control registers (SCI) and audio data (SDI) share one SPI
//! bus and are selected with XCS / XDCS. DREQ high means the FIFO can
//! take at least another 32 bytes.

use defmt::{debug, info, warn, Debug2Format};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use touchplayer::config::{VOLUME_MAX, VOLUME_MIN};
use touchplayer::playback::AudioEngine;
use touchplayer::Error;

/// Byte stream the decoder is fed from.
pub trait StreamSource {
    /// Open `path` for reading from the start, closing any previous file.
    fn open(&mut self, path: &str) -> bool;
    /// Fill `buf`; 0 means end of file (or a read fault).
    fn read(&mut self, buf: &mut [u8]) -> usize;
    fn close(&mut self);
}

// SCI registers
const SCI_MODE: u8 = 0x00;
const SCI_CLOCKF: u8 = 0x03;
const SCI_VOL: u8 = 0x0B;

const SCI_WRITE: u8 = 0x02;
const SCI_READ: u8 = 0x03;

// SCI_MODE bits
const SM_RESET: u16 = 0x0004;
const SM_SDINEW: u16 = 0x0800;

/// XTALI x3.0 with x1.5 boost headroom.
const CLOCKF_VALUE: u16 = 0x6000;

/// Per-channel attenuation that silences the output.
const VOL_SILENT: u8 = 0xFE;

/// Bytes guaranteed to fit once DREQ is high.
const SDI_CHUNK: usize = 32;

/// Read-ahead buffer filled from the stream.
const STREAM_BUF: usize = 512;

/// Upper bound on SDI chunks sent per `service` call.
const MAX_CHUNKS_PER_SERVICE: usize = 16;

/// DREQ polls (10 µs apart) before giving up.
const DREQ_TIMEOUT_POLLS: u32 = 10_000;

pub struct Vs1053<SPI, XCS, XDCS, DREQ, RST, DLY, SRC> {
    spi: SPI,
    xcs: XCS,
    xdcs: XDCS,
    dreq: DREQ,
    reset: RST,
    delay: DLY,
    source: SRC,
    buf: [u8; STREAM_BUF],
    pos: usize,
    len: usize,
    open: bool,
    paused: bool,
}

impl<SPI, XCS, XDCS, DREQ, RST, DLY, SRC> Vs1053<SPI, XCS, XDCS, DREQ, RST, DLY, SRC>
where
    SPI: SpiBus,
    XCS: OutputPin,
    XDCS: OutputPin,
    DREQ: InputPin,
    RST: OutputPin,
    DLY: DelayNs,
    SRC: StreamSource,
{
    /// Hardware-reset the chip and configure it for MP3 playback.
    pub fn new(
        spi: SPI,
        xcs: XCS,
        xdcs: XDCS,
        dreq: DREQ,
        reset: RST,
        delay: DLY,
        source: SRC,
    ) -> Result<Self, Error> {
        let mut dev = Self {
            spi,
            xcs,
            xdcs,
            dreq,
            reset,
            delay,
            source,
            buf: [0; STREAM_BUF],
            pos: 0,
            len: 0,
            open: false,
            paused: false,
        };

        let _ = dev.xcs.set_high();
        let _ = dev.xdcs.set_high();
        let _ = dev.reset.set_low();
        dev.delay.delay_ms(2);
        let _ = dev.reset.set_high();
        dev.delay.delay_ms(5);

        dev.configure()?;
        let mode = dev.sci_read(SCI_MODE)?;
        if mode & SM_SDINEW == 0 {
            warn!("VS1053: unexpected SCI_MODE {=u16:#x}", mode);
            return Err(Error::Audio);
        }
        info!("VS1053: ready");
        Ok(dev)
    }

    fn configure(&mut self) -> Result<(), Error> {
        self.sci_write(SCI_MODE, SM_SDINEW)?;
        self.sci_write(SCI_CLOCKF, CLOCKF_VALUE)?;
        self.delay.delay_ms(1);
        self.wait_dreq()
    }

    fn wait_dreq(&mut self) -> Result<(), Error> {
        for _ in 0..DREQ_TIMEOUT_POLLS {
            if self.dreq.is_high().unwrap_or(false) {
                return Ok(());
            }
            self.delay.delay_us(10);
        }
        warn!("VS1053: DREQ timeout");
        Err(Error::Audio)
    }

    fn sci_write(&mut self, reg: u8, value: u16) -> Result<(), Error> {
        self.wait_dreq()?;
        let [hi, lo] = value.to_be_bytes();
        let _ = self.xcs.set_low();
        let res = self.spi.write(&[SCI_WRITE, reg, hi, lo]).and_then(|_| self.spi.flush());
        let _ = self.xcs.set_high();
        res.map_err(|e| {
            warn!("VS1053: SCI write {=u8:#x}: {:?}", reg, Debug2Format(&e));
            Error::Audio
        })
    }

    fn sci_read(&mut self, reg: u8) -> Result<u16, Error> {
        self.wait_dreq()?;
        let mut frame = [SCI_READ, reg, 0xFF, 0xFF];
        let _ = self.xcs.set_low();
        let res = self.spi.transfer_in_place(&mut frame).and_then(|_| self.spi.flush());
        let _ = self.xcs.set_high();
        res.map_err(|e| {
            warn!("VS1053: SCI read {=u8:#x}: {:?}", reg, Debug2Format(&e));
            Error::Audio
        })?;
        Ok(u16::from_be_bytes([frame[2], frame[3]]))
    }

    /// Send up to one SDI chunk from the read-ahead buffer, refilling it
    /// from the stream when empty. Returns `false` at end of stream.
    fn feed_chunk(&mut self) -> bool {
        if self.pos >= self.len {
            self.len = self.source.read(&mut self.buf);
            self.pos = 0;
            if self.len == 0 {
                return false;
            }
        }

        let end = (self.pos + SDI_CHUNK).min(self.len);
        let _ = self.xdcs.set_low();
        let res = self.spi.write(&self.buf[self.pos..end]).and_then(|_| self.spi.flush());
        let _ = self.xdcs.set_high();
        if let Err(e) = res {
            warn!("VS1053: SDI write: {:?}", Debug2Format(&e));
        }
        self.pos = end;
        true
    }

    fn close_stream(&mut self) {
        self.source.close();
        self.open = false;
        self.paused = false;
        self.pos = 0;
        self.len = 0;
    }

    /// Attenuation register value for an engine-range level.
    pub fn volume_register(level: u8) -> u16 {
        let level = level.clamp(VOLUME_MIN, VOLUME_MAX);
        let att = if level == VOLUME_MIN {
            VOL_SILENT
        } else {
            (VOLUME_MAX - level) * 4
        };
        u16::from_be_bytes([att, att])
    }
}

impl<SPI, XCS, XDCS, DREQ, RST, DLY, SRC> AudioEngine for Vs1053<SPI, XCS, XDCS, DREQ, RST, DLY, SRC>
where
    SPI: SpiBus,
    XCS: OutputPin,
    XDCS: OutputPin,
    DREQ: InputPin,
    RST: OutputPin,
    DLY: DelayNs,
    SRC: StreamSource,
{
    fn start(&mut self, path: &str) {
        self.close_stream();
        if self.source.open(path) {
            self.open = true;
            debug!("VS1053: streaming {}", path);
        }
    }

    /// Close the file and soft-reset the decoder so no stale frames play.
    fn stop(&mut self) {
        let was_open = self.open;
        self.close_stream();
        if was_open {
            let soft_reset = self
                .sci_write(SCI_MODE, SM_SDINEW | SM_RESET)
                .and_then(|_| self.configure());
            if soft_reset.is_err() {
                warn!("VS1053: soft reset failed");
            }
        }
    }

    fn pause_resume(&mut self) {
        if self.open {
            self.paused = !self.paused;
        }
    }

    fn set_volume(&mut self, level: u8) {
        if self.sci_write(SCI_VOL, Self::volume_register(level)).is_err() {
            warn!("VS1053: volume {} not applied", level);
        }
    }

    fn is_running(&self) -> bool {
        self.open && !self.paused
    }

    fn service(&mut self) {
        if !self.is_running() {
            return;
        }
        for _ in 0..MAX_CHUNKS_PER_SERVICE {
            if !self.dreq.is_high().unwrap_or(false) {
                return;
            }
            if !self.feed_chunk() {
                debug!("VS1053: end of stream");
                self.close_stream();
                return;
            }
        }
    }
}
