//! touchplayer - three-button touch MP3 player for nRF52840.
//!
//! Boot order: OLED, SD card catalog, VS1053, flash settings. Any failure
//! on the way shows the fault screen and halts. After that a single
//! cooperative loop calls [`Player::step`] and yields to the executor.

#![no_std]
#![no_main]

mod hw;

use defmt::{error, info};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::spim::{self, Spim};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use touchplayer::catalog::Catalog;
use touchplayer::config::Timing;
use touchplayer::input::ButtonPins;
use touchplayer::ui::{show_fault, Display};
use touchplayer::{Error, Parts, Player};
use {defmt_rtt as _, panic_probe as _};

use hw::clock::Uptime;
use hw::flash::FlashSettings;
use hw::oled::Oled;
use hw::sd::SdMusic;
use hw::vs1053::Vs1053;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    SPI2 => spim::InterruptHandler<peripherals::SPI2>;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("touchplayer starting");

    // ── Display ──────────────────────────────────────────────────────────
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut oled = match Oled::new(i2c) {
        Ok(oled) => oled,
        Err(e) => {
            error!("Fatal: {}", e);
            halt()
        }
    };

    // ── Touch pads (TTP223, active-high) ─────────────────────────────────
    let buttons = ButtonPins::new(
        Input::new(p.P0_03, Pull::Down),
        Input::new(p.P0_04, Pull::Down),
        Input::new(p.P0_28, Pull::Down),
    );

    // ── SD card ──────────────────────────────────────────────────────────
    let mut sd_config = spim::Config::default();
    sd_config.frequency = spim::Frequency::M4;
    let sd_bus = Spim::new(p.SPI2, Irqs, p.P1_15, p.P1_14, p.P1_13, sd_config);
    let sd_cs = Output::new(p.P1_12, Level::High, OutputDrive::Standard);
    let sd_device = match ExclusiveDevice::new(sd_bus, sd_cs, Delay) {
        Ok(device) => device,
        Err(_) => fault(&mut oled, Error::StorageUnavailable),
    };
    let mut music = SdMusic::new(SdCard::new(sd_device, Delay));

    let catalog = match Catalog::scan(&mut music) {
        Ok(catalog) => catalog,
        Err(e) => fault(&mut oled, e),
    };

    // ── Decoder ──────────────────────────────────────────────────────────
    let mut vs_config = spim::Config::default();
    vs_config.frequency = spim::Frequency::M1;
    let vs_bus = Spim::new(p.SPI3, Irqs, p.P0_13, p.P0_15, p.P0_14, vs_config);
    let audio = match Vs1053::new(
        vs_bus,
        Output::new(p.P0_16, Level::High, OutputDrive::Standard),
        Output::new(p.P0_17, Level::High, OutputDrive::Standard),
        Input::new(p.P0_19, Pull::None),
        Output::new(p.P0_20, Level::Low, OutputDrive::Standard),
        Delay,
        music,
    ) {
        Ok(audio) => audio,
        Err(e) => fault(&mut oled, e),
    };

    // ── Settings ─────────────────────────────────────────────────────────
    let store = FlashSettings::new(BlockingAsync::new(Nvmc::new(p.NVMC)));

    let parts = Parts {
        buttons,
        audio,
        store,
        delay: Delay,
        display: oled,
        clock: Uptime,
    };
    let mut player = match Player::boot(catalog, parts, Timing::default()) {
        Ok(player) => player,
        // Fault screen already drawn.
        Err(_) => halt(),
    };

    loop {
        player.step();
        embassy_futures::yield_now().await;
    }
}

fn fault<D: Display>(display: &mut D, error: Error) -> ! {
    error!("Fatal: {}", error);
    show_fault(display, error);
    halt()
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
