use crate::alloc::string::ToString;
use core::fmt::Write;

use log::{Level, Metadata, Record};
use sweeprig_hardware::serial::DebugSerialPort;

pub type LoggerType = DebugSerialPort;

struct DummyType;

static DUMMY_LOGGER: DummyType = DummyType;
static mut SERIAL_LOGGER: Option<LoggerType> = None;

pub fn init(logger: LoggerType, level: Level) {
    unsafe {
        SERIAL_LOGGER = Some(logger);
    }
    log::set_logger(&DUMMY_LOGGER).unwrap();
    log::set_max_level(level.to_level_filter());
}

impl log::Log for DummyType {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let args = record.args();
            let record_str = if let Some(s) = args.as_str() {
                s.to_string()
            } else {
                args.to_string()
            };

            unsafe {
                if let Some(tx) = &mut SERIAL_LOGGER {
                    writeln!(tx, "{}\r", record_str).ok();
                }
            }
        }
    }

    fn flush(&self) {}
}
