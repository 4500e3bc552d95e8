#![allow(dead_code)]

use stm32f4xx_hal::gpio::{Output, PushPull, PD12, PD13, PD14, PD15};

pub type GreenLed = PD12<Output<PushPull>>;
pub type OrangeLed = PD13<Output<PushPull>>;
pub type RedLed = PD14<Output<PushPull>>;
pub type BlueLed = PD15<Output<PushPull>>;
