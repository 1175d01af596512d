//! megamega-hw-interface
//!
//! RP2350 firmware for the megamega2612. Wires the synth core to the
//! hardware:
//!
//! 1. MIDI bytes arrive on UART0 at 31250 baud; the MIDI task feeds them
//!    one at a time to `SharedSynth::on_midi_byte`.
//! 2. The tick task runs `SharedSynth::on_tick` every
//!    `SynthConfig::tick_period_us`, keying voices on and off.
//! 3. The panel task wakes on any edge of the encoder or button pins and
//!    hands a snapshot to `SharedSynth::on_panel_sample`.
//! 4. Register writes leave over SPI0 to the bridge controller that owns
//!    the YM2612 bus, one `[group, register, value]` frame per write.
//! 5. Display text goes through a `Signal` to the OLED task, which draws
//!    it on the SSD1306 at up to 30 Hz.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::select4;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, SPI0, UART0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedUartRx};
use embassy_time::{Duration, Ticker, Timer};
use embedded_io_async::Read;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use megamega::{ChannelGroup, PanelSample, RegisterSink, SharedSynth, Synth, SynthConfig};
use megamega_panel::{display_update_task, PanelConfig, PanelDriver, SignalDisplay, TextSignal};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    UART0_IRQ => uart::BufferedInterruptHandler<UART0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Latest panel text, written by the synth and drawn by the OLED task.
static TEXT: TextSignal = TextSignal::new();

/// The synth core, shared by the MIDI, tick and panel tasks.
static SYNTH: StaticCell<Core> = StaticCell::new();

/// Receive buffer for the MIDI UART.
static MIDI_RX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Core = SharedSynth<SpiBridge, SignalDisplay<'static>>;

type OledI2c = I2c<'static, I2C0, i2c::Async>;

// ---------------------------------------------------------------------------
// Register bridge
// ---------------------------------------------------------------------------

/// Sends each register write to the bridge controller as one 3-byte SPI
/// frame `[group_flag, register, value]` under chip select.
struct SpiBridge {
    spi: Spi<'static, SPI0, spi::Blocking>,
    cs: Output<'static>,
}

impl RegisterSink for SpiBridge {
    fn write(&mut self, group: ChannelGroup, register: u8, value: u8) {
        self.cs.set_low();
        let result = self.spi.blocking_write(&[group.flag(), register, value]);
        self.cs.set_high();

        // The sink is infallible; a failed frame is logged and dropped.
        if result.is_err() {
            error!("Register bridge write failed: reg {=u8:#x}", register);
        }
    }
}

// ---------------------------------------------------------------------------
// Front panel
// ---------------------------------------------------------------------------

/// Encoder and button inputs. All four are pulled up; the buttons are
/// active-low.
struct PanelPins {
    enc_a: Input<'static>,
    enc_b: Input<'static>,
    button_a: Input<'static>,
    button_b: Input<'static>,
}

impl PanelPins {
    fn sample(&self) -> PanelSample {
        PanelSample {
            enc_a: self.enc_a.is_high(),
            enc_b: self.enc_b.is_high(),
            button_a: self.button_a.is_low(),
            button_b: self.button_b.is_low(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `display_update_task`.
#[embassy_executor::task]
async fn oled_task(driver: PanelDriver<OledI2c>, config: PanelConfig) {
    display_update_task(driver, &TEXT, config).await;
}

/// Feeds received MIDI bytes to the synth, one at a time.
#[embassy_executor::task]
async fn midi_task(mut rx: BufferedUartRx, synth: &'static Core) {
    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(1) => {
                if let Some(action) = synth.on_midi_byte(byte[0]) {
                    trace!("MIDI {}", action);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("MIDI UART error: {}", e),
        }
    }
}

/// Periodic voice reconciliation.
#[embassy_executor::task]
async fn tick_task(synth: &'static Core, period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        synth.on_tick();
    }
}

/// Samples the panel on every edge of any of its four pins.
#[embassy_executor::task]
async fn panel_task(mut pins: PanelPins, synth: &'static Core) {
    loop {
        select4(
            pins.enc_a.wait_for_any_edge(),
            pins.enc_b.wait_for_any_edge(),
            pins.button_a.wait_for_any_edge(),
            pins.button_b.wait_for_any_edge(),
        )
        .await;

        let applied = synth.on_panel_sample(pins.sample());
        if applied > 0 {
            debug!("Panel: {} gesture(s)", applied);
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("megamega-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // MIDI_RX  → GP1   (UART0 RX, 31250 baud)
    // SPI_CS   → GP17  (bridge chip select, active-low)
    // SPI_SCK  → GP18
    // SPI_MOSI → GP19
    // I2C_SDA  → GP20  (OLED)
    // I2C_SCL  → GP21
    // ENC_A    → GP10, ENC_B → GP11
    // BTN_A    → GP12, BTN_B → GP13  (active-low)
    // ———————————————————————————————————————————————————————————————————————

    let config = SynthConfig::default();

    // Register bridge.
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 8_000_000;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let regs = SpiBridge { spi, cs };

    let synth: &'static Core = SYNTH.init(SharedSynth::new(Synth::new(
        config,
        regs,
        SignalDisplay::new(&TEXT),
    )));

    // Front panel. Seed the decoder with the levels at power-up.
    let pins = PanelPins {
        enc_a: Input::new(p.PIN_10, Pull::Up),
        enc_b: Input::new(p.PIN_11, Pull::Up),
        button_a: Input::new(p.PIN_12, Pull::Up),
        button_b: Input::new(p.PIN_13, Pull::Up),
    };
    let initial = pins.sample();
    synth.lock(|s| s.seed_panel(initial));

    // OLED on I2C0 at the standard SSD1306 address.
    let i2c = I2c::new_async(p.I2C0, p.PIN_21, p.PIN_20, Irqs, i2c::Config::default());
    let oled = PanelDriver::new(i2c, 0x3C);
    spawner.spawn(unwrap!(oled_task(oled, PanelConfig::default())));

    // —— Startup sequence ———————————————————————————————————————————————————

    synth.show_banner();
    Timer::after_millis(1500).await;
    synth.start();

    // —— MIDI UART ——————————————————————————————————————————————————————————

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = 31_250;
    let rx = BufferedUartRx::new(
        p.UART0,
        Irqs,
        p.PIN_1,
        MIDI_RX_BUFFER.init([0; 64]),
        uart_config,
    );

    // —— Spawn tasks ————————————————————————————————————————————————————————

    let tick_period = Duration::from_micros(config.tick_period_us);

    spawner.spawn(unwrap!(tick_task(synth, tick_period)));
    spawner.spawn(unwrap!(midi_task(rx, synth)));
    spawner.spawn(unwrap!(panel_task(pins, synth)));

    info!("All tasks spawned");
}
