#![no_std]
#![cfg_attr(not(test), no_main)]

extern crate alloc;

mod loggers;
mod ramp;
mod speed;

#[cfg(feature = "defmt_logger")]
use defmt_rtt as _;
#[cfg(feature = "defmt_logger")]
use panic_probe as _;
#[cfg(all(
    not(feature = "defmt_logger"),
    any(feature = "serial_logger", feature = "null_logger")
))]
use panic_halt as _;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

const PULSES_PER_REV: u32 = 20;
const MAX_DUTY: u8 = 255;
const DUTY_STEP: u8 = 5;
// step delay doubles as the speed sampling interval: one sample per step
const STEP_DELAY_MS: u32 = 200;
const HOLD_DELAY_MS: u32 = 2000;

// the RTIC app only links against cortex-m-rt; host-side unit tests build
// the modules above without it
#[cfg(not(test))]
#[rtic::app(device = stm32f4xx_hal::pac)]
mod app {
    use super::*;

    use crate::ramp::{HoldPoint, RampSequencer, SweepStep};
    use crate::speed::SpeedEstimator;

    use alloc_cortex_m::CortexMHeap;
    use log::info;
    use stm32f4xx_hal::{prelude::*, timer::SysDelay};
    use sweeprig_hardware::{
        encoder::{EncoderA, EncoderB, PulseCounter},
        led::{BlueLed, GreenLed, OrangeLed, RedLed},
        motor::{MotorA, MotorB},
        SampleClock, SweeprigHardware,
    };

    #[global_allocator]
    static ALLOCATOR: CortexMHeap = CortexMHeap::empty();

    static ENCODER_A_PULSES: PulseCounter = PulseCounter::new();
    static ENCODER_B_PULSES: PulseCounter = PulseCounter::new();

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        motor_a: MotorA,
        motor_b: MotorB,
        estimator: SpeedEstimator,
        clock: SampleClock,
        delay: SysDelay,
        blue_led: BlueLed,
        _green_led: GreenLed,
        _orange_led: OrangeLed,
        _red_led: RedLed,
        encoder_a: EncoderA,
        encoder_b: EncoderB,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local) {
        // Initialize heap
        {
            use core::mem::MaybeUninit;
            const HEAP_SIZE: usize = 1024;
            static mut HEAP: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
            unsafe { ALLOCATOR.init(HEAP.as_ptr() as usize, HEAP_SIZE) }
        }

        let mut hw = SweeprigHardware::init(ctx.device, ctx.core);

        #[cfg(feature = "defmt_logger")]
        loggers::defmt_logger::init(loggers::Level::Info);
        #[cfg(all(feature = "serial_logger", not(feature = "defmt_logger")))]
        loggers::serial_logger::init(hw.dbg_serial, loggers::Level::Info);
        #[cfg(all(feature = "null_logger", not(feature = "defmt_logger")))]
        loggers::null_logger::init(loggers::Level::Info);

        info!("{} v{}", NAME, VERSION);

        hw.green_led.set_high();

        (
            Shared {},
            Local {
                motor_a: hw.motor_a,
                motor_b: hw.motor_b,
                estimator: SpeedEstimator::new(PULSES_PER_REV, STEP_DELAY_MS),
                clock: hw.clock,
                delay: hw.delay,
                blue_led: hw.blue_led,
                _green_led: hw.green_led,
                _orange_led: hw.orange_led,
                _red_led: hw.red_led,
                encoder_a: hw.encoder_a,
                encoder_b: hw.encoder_b,
            },
        )
    }

    #[idle(local = [motor_a, motor_b, estimator, clock, delay, blue_led])]
    fn idle(ctx: idle::Context) -> ! {
        let motor_a = ctx.local.motor_a;
        let motor_b = ctx.local.motor_b;
        let estimator = ctx.local.estimator;
        let clock = ctx.local.clock;
        let delay = ctx.local.delay;
        let blue_led = ctx.local.blue_led;

        let mut sequencer = RampSequencer::continuous(MAX_DUTY, DUTY_STEP);
        while let Some(step) = sequencer.next() {
            match step {
                SweepStep::CycleStart { forward } => {
                    let direction = if forward { "forward" } else { "reverse" };
                    info!("Starting gradual acceleration ({})...", direction);
                }
                SweepStep::Drive { duty, forward } => {
                    motor_a.set_speed(duty as i32, forward);
                    motor_b.set_speed(duty as i32, forward);

                    delay.delay_ms(STEP_DELAY_MS);
                    let sample =
                        estimator.update(clock.now(), &ENCODER_A_PULSES, &ENCODER_B_PULSES);
                    blue_led.toggle();

                    info!(
                        "Motor A: {:.1} RPM | Motor B: {:.1} RPM | PWM: {}",
                        sample.motor_a_rpm, sample.motor_b_rpm, duty
                    );
                }
                SweepStep::Hold(HoldPoint::Max) => {
                    info!("Reached maximum speed!");
                    delay.delay_ms(HOLD_DELAY_MS);
                    info!("Starting gradual deceleration...");
                }
                SweepStep::Hold(HoldPoint::Min) => {
                    info!("Motors stopped!");
                    info!("Reached minimum speed!");
                    delay.delay_ms(HOLD_DELAY_MS);
                }
            }
        }

        // only reachable with a finite-cycle sequencer
        loop {
            cortex_m::asm::wfi();
        }
    }

    #[task(binds = EXTI0, priority = 3, local = [encoder_a])]
    fn encoder_a_edge(ctx: encoder_a_edge::Context) {
        ctx.local.encoder_a.clear_interrupt();
        ENCODER_A_PULSES.record();
    }

    #[task(binds = EXTI1, priority = 3, local = [encoder_b])]
    fn encoder_b_edge(ctx: encoder_b_edge::Context) {
        ctx.local.encoder_b.clear_interrupt();
        ENCODER_B_PULSES.record();
    }
}
