// Driver for one channel of a dual brushed DC motor carrier
// (one direction pin + one PWM speed input per motor)

use stm32f4xx_hal::{
    gpio::{Output, Pin, PushPull},
    pac::TIM3,
    timer::{pwm::PwmExt, PwmChannel},
};

/// Logical duty command range, matching the carrier's 8-bit resolution.
pub const MAX_DUTY: u8 = 255;

pub struct MotorDriver<P1: PwmExt, const C: u8, const DP: char, const DN: u8> {
    pwm: PwmChannel<P1, C>,
    dir: Pin<DP, DN, Output<PushPull>>,
}

pub type MotorA = MotorDriver<TIM3, 0, 'C', 0>;
pub type MotorB = MotorDriver<TIM3, 1, 'C', 1>;

impl<P1: PwmExt, const C: u8, const DP: char, const DN: u8> MotorDriver<P1, C, DP, DN> {
    pub fn new(pwm: PwmChannel<P1, C>, dir: Pin<DP, DN, Output<PushPull>>) -> Self {
        let mut driver = Self { pwm, dir };
        driver.pwm.enable();

        // Logical zero maps to raw duty 255 when forward, so the channel must
        // be commanded explicitly before the motor is actually off.
        driver.set_speed(0, true);

        driver
    }

    /// Applies `duty` in the given direction. Out-of-range commands are
    /// clamped to 0-255. The direction pin is written before the duty.
    pub fn set_speed(&mut self, duty: i32, forward: bool) {
        if forward {
            self.dir.set_high();
        } else {
            self.dir.set_low();
        }

        let effective = effective_duty(duty, forward);
        let max = self.pwm.get_max_duty();
        let raw = (effective as u32 * max as u32 / MAX_DUTY as u32) as u16;
        self.pwm.set_duty(raw);
    }
}

/// Maps a logical duty command to the 8-bit value written to the PWM channel.
///
/// Forward inverts the command: with the direction pin held high the motor
/// sees the difference between the two inputs, so a *lower* raw duty means
/// *more* drive. Kept bit-exact with the board wiring.
pub fn effective_duty(duty: i32, forward: bool) -> u8 {
    let mapped = if forward { 255 - duty } else { duty };
    mapped.clamp(0, MAX_DUTY as i32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_inverts_then_clamps() {
        for duty in -100..=400 {
            let expected = (255 - duty).clamp(0, 255) as u8;
            assert_eq!(effective_duty(duty, true), expected, "duty={}", duty);
        }
    }

    #[test]
    fn reverse_clamps_only() {
        for duty in -100..=400 {
            let expected = duty.clamp(0, 255) as u8;
            assert_eq!(effective_duty(duty, false), expected, "duty={}", duty);
        }
    }

    #[test]
    fn forward_zero_is_raw_full_scale() {
        assert_eq!(effective_duty(0, true), 255);
    }

    #[test]
    fn reverse_zero_is_raw_zero() {
        assert_eq!(effective_duty(0, false), 0);
    }
}
