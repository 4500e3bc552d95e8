use stm32f4xx_hal::{pac::USART1, serial::Tx};

pub type DebugSerialPort = Tx<USART1>;
