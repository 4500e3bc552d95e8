#![no_std]

use fugit::MicrosDurationU32;
use stm32f4xx_hal::{
    gpio::Edge,
    pac::{CorePeripherals, Peripherals, TIM2},
    prelude::*,
    timer::{Channel1, Channel2, Counter, SysDelay, Timer3},
};

pub mod encoder;
pub mod led;
pub mod motor;
pub mod serial;

use encoder::{EncoderA, EncoderB, EncoderInput};
use led::{BlueLed, GreenLed, OrangeLed, RedLed};
use motor::{MotorA, MotorB, MotorDriver};
use serial::DebugSerialPort;

/// PWM carrier for both motor channels.
const PWM_FREQ_KHZ: u32 = 5;

/// Free-running microsecond counter used to time the sampling windows.
pub type SampleClock = Counter<TIM2, 1_000_000>;

pub struct SweeprigHardware {
    pub clock: SampleClock,
    pub delay: SysDelay,

    pub green_led: GreenLed,
    pub orange_led: OrangeLed,
    pub red_led: RedLed,
    pub blue_led: BlueLed,

    pub dbg_serial: DebugSerialPort,

    pub motor_a: MotorA,
    pub motor_b: MotorB,

    pub encoder_a: EncoderA,
    pub encoder_b: EncoderB,
}

impl SweeprigHardware {
    pub fn init(mut pac: Peripherals, core: CorePeripherals) -> Self {
        // set DBGMCU to allow wfi in idle while RTT logging is attached
        pac.DBGMCU.cr.modify(|_, w| {
            w.dbg_sleep().set_bit();
            w.dbg_standby().set_bit();
            w.dbg_stop().set_bit()
        });
        // enabling the dma1 clock keeps one AHB bus master active, which prevents SRAM from reading as 0's
        // https://github.com/probe-rs/probe-rs/issues/350#issuecomment-740550519
        pac.RCC.ahb1enr.modify(|_, w| w.dma1en().enabled());

        let mut syscfg = pac.SYSCFG.constrain();

        let rcc = pac.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(168.MHz()).freeze();

        let mut clock = pac.TIM2.counter_us(&clocks);
        clock
            .start(MicrosDurationU32::from_ticks(u32::MAX))
            .unwrap();
        let delay = core.SYST.delay(&clocks);

        let gpioa = pac.GPIOA.split();
        let gpiob = pac.GPIOB.split();
        let gpioc = pac.GPIOC.split();
        let gpiod = pac.GPIOD.split();

        // Status LED's
        let green_led = gpiod.pd12.into_push_pull_output();
        let orange_led = gpiod.pd13.into_push_pull_output();
        let red_led = gpiod.pd14.into_push_pull_output();
        let blue_led = gpiod.pd15.into_push_pull_output();

        let debug_tx_pin = gpioa.pa9.into_alternate();
        let dbg_serial = pac.USART1.tx(debug_tx_pin, 115200.bps(), &clocks).unwrap();

        let tim3 = Timer3::new(pac.TIM3, &clocks);
        let pwm_pins = (Channel1::new(gpioc.pc6), Channel2::new(gpioc.pc7));
        let pwm = tim3.pwm_hz(pwm_pins, PWM_FREQ_KHZ.kHz());
        let (pwm_a, pwm_b) = pwm.split();

        // Both drivers come up commanded off, forward
        let motor_a = MotorDriver::new(pwm_a, gpioc.pc0.into_push_pull_output());
        let motor_b = MotorDriver::new(pwm_b, gpioc.pc1.into_push_pull_output());

        // Encoder channel A
        let mut enc_a_pin = gpiob.pb0.into_pull_up_input();
        enc_a_pin.make_interrupt_source(&mut syscfg);
        enc_a_pin.enable_interrupt(&mut pac.EXTI);
        enc_a_pin.trigger_on_edge(&mut pac.EXTI, Edge::Rising);
        let encoder_a = EncoderInput::new(enc_a_pin);

        // Encoder channel B
        let mut enc_b_pin = gpiob.pb1.into_pull_up_input();
        enc_b_pin.make_interrupt_source(&mut syscfg);
        enc_b_pin.enable_interrupt(&mut pac.EXTI);
        enc_b_pin.trigger_on_edge(&mut pac.EXTI, Edge::Rising);
        let encoder_b = EncoderInput::new(enc_b_pin);

        Self {
            clock,
            delay,
            green_led,
            orange_led,
            red_led,
            blue_led,
            dbg_serial,
            motor_a,
            motor_b,
            encoder_a,
            encoder_b,
        }
    }
}
