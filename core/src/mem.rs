//! The memory chips: 16x16 RAM, 16x16 ROM, and the combined memory unit.
//!
//! Both chips are 16 words deep and addressed by four lines. The RAM
//! steers a write pulse to exactly one of sixteen registers through a
//! one-hot decoder; the ROM is sixteen constant words. Reads on either
//! chip are combinational, one 16-to-1 multiplexer per bit position over
//! bit-sliced views of the stored words.

use arbitrary_int::u4;

use crate::gate::Gate;
use crate::isa::Program;
use crate::latch::Register;
use crate::logic::{Decoder4to16Gate, Mask1xNGate, Mux16to1Gate};
use crate::signal::{Bus, Bus16, Signal};

/// Sixteen 16-bit registers behind a one-hot address decoder.
///
/// A write latches on a rising clock edge when `st` is asserted: the
/// decoded address, masked with `st`, drives exactly one register's
/// store-enable. The read path is combinational through the per-bit
/// multiplexers, so the addressed word appears on `out` within the same
/// pass.
pub struct Ram16x16 {
    decoder: Decoder4to16Gate,
    mask: Mask1xNGate<16>,
    registers: Vec<Register>,
    muxes: Vec<Mux16to1Gate>,
    words: Vec<Bus16>,
}

impl Ram16x16 {
    /// Wire the RAM between a store-enable line, a data bus, a 4-line
    /// address bus, the clock and an output bus.
    #[must_use]
    pub fn new(st: &Signal, x: &Bus16, addr: &Bus<4>, clk: &Signal, out: &Bus16) -> Self {
        let hot = Bus::<16>::new();
        let select = Bus::<16>::new();

        let decoder = Decoder4to16Gate::new(addr, &hot);
        let mask = Mask1xNGate::new(st, &hot, &select);

        let words: Vec<Bus16> = (0..16).map(|_| Bus16::new()).collect();
        let registers = (0..16)
            .map(|k| Register::new(&select.line(k), x, clk, &words[k]))
            .collect();

        // One mux per bit position, each reading a view bus assembled
        // from that bit of every stored word.
        let muxes = (0..16)
            .map(|bit| {
                let mut slice = Bus16::new();
                for (k, word) in words.iter().enumerate() {
                    slice.set_line(k, &word.line(bit));
                }
                Mux16to1Gate::new(&slice, addr, &out.line(bit))
            })
            .collect();

        Self {
            decoder,
            mask,
            registers,
            muxes,
            words,
        }
    }

    /// Read the stored word at `addr` directly, bypassing the read mux.
    #[must_use]
    pub fn word(&self, addr: u4) -> u16 {
        self.words[usize::from(addr.value())].value()
    }
}

impl Gate for Ram16x16 {
    fn update(&mut self) {
        self.decoder.update();
        self.mask.update();
        for register in &mut self.registers {
            register.update();
        }
        for mux in &mut self.muxes {
            mux.update();
        }
    }
}

/// Sixteen immutable 16-bit words, read combinationally.
///
/// The image is fixed at construction; the stored cells are written once
/// and no gate ever drives them again.
pub struct Rom16x16 {
    muxes: Vec<Mux16to1Gate>,
    words: Vec<Bus16>,
}

impl Rom16x16 {
    /// Wire the ROM between a 4-line address bus and an output bus,
    /// loaded with the given program image.
    #[must_use]
    pub fn new(program: &Program, addr: &Bus<4>, out: &Bus16) -> Self {
        let words: Vec<Bus16> = program
            .words()
            .iter()
            .map(|&word| {
                let cells = Bus16::new();
                cells.set_value(word);
                cells
            })
            .collect();

        let muxes = (0..16)
            .map(|bit| {
                let mut slice = Bus16::new();
                for (k, word) in words.iter().enumerate() {
                    slice.set_line(k, &word.line(bit));
                }
                Mux16to1Gate::new(&slice, addr, &out.line(bit))
            })
            .collect();

        Self { muxes, words }
    }

    /// Read the stored word at `addr` directly, bypassing the read mux.
    #[must_use]
    pub fn word(&self, addr: u4) -> u16 {
        self.words[usize::from(addr.value())].value()
    }

    /// Return the checksum of the loaded image.
    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.words.iter().map(Bus16::value).fold(0, u16::wrapping_add)
    }
}

impl Gate for Rom16x16 {
    fn update(&mut self) {
        for mux in &mut self.muxes {
            mux.update();
        }
    }
}

/// The machine's writable state: registers A and D plus the RAM, all fed
/// from one result bus.
///
/// The RAM is addressed by A's output, so a store through `sel_pa` uses
/// the address A held when the clock rose.
pub struct MemoryUnit {
    a: Register,
    d: Register,
    ram: Ram16x16,
}

impl MemoryUnit {
    /// Wire the unit between the three write-enable lines, the result
    /// bus, the clock and the A/D/PA observation buses.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        sel_a: &Signal,
        sel_d: &Signal,
        sel_pa: &Signal,
        x: &Bus16,
        clk: &Signal,
        a: &Bus16,
        d: &Bus16,
        pa: &Bus16,
    ) -> Self {
        Self {
            a: Register::new(sel_a, x, clk, a),
            d: Register::new(sel_d, x, clk, d),
            ram: Ram16x16::new(sel_pa, x, &a.slice::<4>(0), clk, pa),
        }
    }
}

impl Gate for MemoryUnit {
    fn update(&mut self) {
        self.a.update();
        self.d.update();
        self.ram.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::HALT;

    #[test]
    fn ram_writes_latch_and_reads_follow_the_address() {
        let st = Signal::new();
        let x = Bus16::new();
        let addr = Bus::<4>::new();
        let clk = Signal::new();
        let out = Bus16::new();
        let mut ram = Ram16x16::new(&st, &x, &addr, &clk, &out);

        let mut check = |st_level, x_value: u16, addr_value: u16, clk_level, expect: u16| {
            st.set(st_level);
            x.set_value(x_value);
            addr.set_value(addr_value);
            clk.set(clk_level);
            ram.update();
            assert_eq!(out.value(), expect);
        };

        check(true, 42, 2, true, 0);
        check(true, 42, 2, false, 42);

        check(true, 69, 3, true, 0);
        check(true, 69, 3, false, 69);

        // Store-enable released: both words persist.
        check(false, 0, 2, true, 42);
        check(false, 0, 2, false, 42);

        check(false, 0, 3, true, 69);
        check(false, 0, 3, false, 69);
    }

    #[test]
    fn ram_words_persist_across_idle_cycles() {
        let st = Signal::new();
        let x = Bus16::new();
        let addr = Bus::<4>::new();
        let clk = Signal::new();
        let out = Bus16::new();
        let mut ram = Ram16x16::new(&st, &x, &addr, &clk, &out);

        st.set(true);
        x.set_value(0x1234);
        addr.set_value(7);
        clk.set(true);
        ram.update();
        clk.set(false);
        ram.update();

        st.set(false);
        for _ in 0..5 {
            clk.set(true);
            ram.update();
            clk.set(false);
            ram.update();
        }

        addr.set_value(7);
        ram.update();
        assert_eq!(out.value(), 0x1234);
        assert_eq!(ram.word(u4::new(7)), 0x1234);
        assert_eq!(ram.word(u4::new(6)), 0);
    }

    #[test]
    fn rom_serves_the_loaded_image() {
        let program = Program::from_words(&[0x0004, 0x1234, 0xc000]);
        let addr = Bus::<4>::new();
        let out = Bus16::new();
        let mut rom = Rom16x16::new(&program, &addr, &out);

        addr.set_value(0);
        rom.update();
        assert_eq!(out.value(), 0x0004);

        addr.set_value(1);
        rom.update();
        assert_eq!(out.value(), 0x1234);

        addr.set_value(15);
        rom.update();
        assert_eq!(out.value(), HALT);

        assert_eq!(rom.word(u4::new(1)), 0x1234);
    }

    #[test]
    fn rom_checksum_fingerprints_the_image() {
        let image = [0x0102u16; 16];
        let addr = Bus::<4>::new();
        let out = Bus16::new();
        let rom = Rom16x16::new(&Program::new(image), &addr, &out);

        let expected = image.iter().fold(0u16, |sum, &w| sum.wrapping_add(w));
        assert_eq!(rom.checksum(), expected);
    }

    #[test]
    fn memory_unit_routes_the_result_bus() {
        let sel_a = Signal::new();
        let sel_d = Signal::new();
        let sel_pa = Signal::new();
        let x = Bus16::new();
        let clk = Signal::new();
        let a = Bus16::new();
        let d = Bus16::new();
        let pa = Bus16::new();
        let mut unit = MemoryUnit::new(&sel_a, &sel_d, &sel_pa, &x, &clk, &a, &d, &pa);

        #[allow(clippy::fn_params_excessive_bools)]
        let mut check = |a_st: bool,
                         d_st: bool,
                         pa_st: bool,
                         x_value: u16,
                         clk_level: bool,
                         expect_a: u16,
                         expect_d: u16,
                         expect_pa: u16| {
            sel_a.set(a_st);
            sel_d.set(d_st);
            sel_pa.set(pa_st);
            x.set_value(x_value);
            clk.set(clk_level);
            unit.update();
            assert_eq!(a.value(), expect_a);
            assert_eq!(d.value(), expect_d);
            assert_eq!(pa.value(), expect_pa);
        };

        check(false, false, false, 0, false, 0, 0, 0);
        check(true, false, true, 2, true, 0, 0, 0);
        check(true, false, true, 2, false, 2, 0, 0);

        // A second pulse is needed before the RAM store sees the new
        // address held in A.
        check(true, false, true, 2, true, 2, 0, 0);
        check(true, false, true, 2, false, 2, 0, 2);

        check(false, true, false, 0xabcd, true, 2, 0, 2);
        check(false, true, false, 0xabcd, false, 2, 0xabcd, 2);

        // The RAM decodes only A's low four lines: address 18 wraps to 2.
        check(true, false, false, 18, true, 2, 0xabcd, 2);
        check(true, false, false, 18, false, 18, 0xabcd, 2);
    }
}
