//! Feeds arbitrary words, addresses and widths through decode, execute and
//! the bus.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rv64_core::{step_one, Bus, DecodedInstruction, Device, Hart, HartConfig, Register};

const BASE: u64 = 0x8000_0000;
const CAPACITY: u64 = 0x1000;

fuzz_target!(|data: &[u8]| {
    if data.len() < 13 {
        return;
    }

    let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let addr = u64::from_le_bytes([
        data[4], data[5], data[6], data[7], data[8], data[9], data[10], data[11],
    ]);
    let width = data[12];

    let _ = DecodedInstruction::decode(word);

    let Ok(mut bus) = Bus::with_ram(BASE, CAPACITY) else {
        return;
    };
    let _ = bus.store(addr, width, u64::from(word));
    let _ = bus.load(addr, width);

    let config = HartConfig::new(BASE, CAPACITY);
    let Ok(mut hart) = Hart::new(&config) else {
        return;
    };
    if hart.initialize(&data[..4]).is_err() {
        return;
    }
    hart.set_reg(Register::from_u5(word >> 15), addr);
    let _ = step_one(&mut hart);
});
